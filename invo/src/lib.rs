pub mod analytic;
pub mod beneficiary;
pub mod category;
pub mod client;
pub mod database;
pub mod date;
pub mod db;
pub mod entry;
pub mod financial;
pub mod profile;
pub mod result;
pub mod schema;
pub mod slug;


pub use oxydized_money::Decimal;

pub use analytic::{Analytic, Report};
pub use beneficiary::{Beneficiary, BeneficiaryGroup};
pub use category::{Category, CategoryKind, SubCategory};
pub use client::Client;
pub use database::{Conn, Database};
pub use entry::Entry;
pub use financial::{Financial, FinancialKind};
pub use profile::Profile;
pub use result::{Error, Result};
pub use slug::Slug;

pub mod prelude {
    pub use crate::database::{Conn, Database};
    pub use crate::result::{Error, OptionalExtension, Result};
    pub use crate::slug::Slug;
    pub use crate::{db, Decimal};

    pub use crate::analytic::{Analytic, Report};
    pub use crate::beneficiary::{Beneficiary, BeneficiaryGroup};
    pub use crate::category::{Category, CategoryKind, SubCategory};
    pub use crate::client::Client;
    pub use crate::entry::{Condition, Entry};
    pub use crate::financial::{Financial, FinancialKind};
    pub use crate::profile::Profile;
}
