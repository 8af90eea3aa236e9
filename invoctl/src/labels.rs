use std::borrow::Cow;

use anyhow::Result;

use invo::beneficiary::{NewBeneficiary, NewBeneficiaryGroup, QueryBeneficiary};
use invo::category::{NewCategory, NewSubCategory, QueryCategory, QuerySubCategory};
use invo::client::{NewClient, QueryClient};
use invo::financial::{NewFinancial, QueryFinancial};
use invo::prelude::*;

use crate::cli::{
    BeneficiaryCommands, CategoryCommands, ClientCommands, FinancialCommands,
    SubcategoryCommands,
};
use crate::config::Config;
use crate::utils::confirm;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct CategoryToDisplay(Category);

impl Tabled for CategoryToDisplay {
    const LENGTH: usize = 3;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.slug.to_string().into(),
            self.0.name.clone().into(),
            self.0.kind.to_string().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec!["slug".into(), "name".into(), "kind".into()]
    }
}

pub fn category(config: &Config, command: &CategoryCommands) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    match command {
        CategoryCommands::List {} => {
            let categories = QueryCategory {
                profile_id: profile.id,
                ..Default::default()
            }
            .run(conn)?
            .into_iter()
            .map(CategoryToDisplay::from)
            .collect::<Vec<_>>();

            println!("{}", Table::new(categories));
        }
        CategoryCommands::Create { name, kind } => {
            let category = NewCategory {
                profile: &profile,
                name,
                kind: *kind,
            }
            .save(conn)?;

            println!("Category created: {}", category.slug);
        }
        CategoryCommands::Delete { slug, confirm: ok } => {
            if !ok || !confirm()? {
                anyhow::bail!("operation requires confirmation");
            }

            Category::find_by_slug(conn, profile.id, slug)?.delete(conn)?;
            println!("Category removed successfully.");
        }
    }

    Ok(())
}

#[derive(derive_more::From)]
struct SubCategoryToDisplay(SubCategory, Category);

impl Tabled for SubCategoryToDisplay {
    const LENGTH: usize = 3;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.slug.to_string().into(),
            self.0.name.clone().into(),
            self.1.name.clone().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec!["slug".into(), "name".into(), "category".into()]
    }
}

pub fn subcategory(config: &Config, command: &SubcategoryCommands) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    match command {
        SubcategoryCommands::List { category } => {
            let category_id = category
                .as_ref()
                .map(|slug| Category::find_by_slug(conn, profile.id, slug))
                .transpose()?
                .map(|category| category.id);

            let subcategories = QuerySubCategory {
                profile_id: profile.id,
                category_id,
                ..Default::default()
            }
            .run(conn)?
            .into_iter()
            .map(SubCategoryToDisplay::from)
            .collect::<Vec<_>>();

            println!("{}", Table::new(subcategories));
        }
        SubcategoryCommands::Create { category, name } => {
            let category = Category::find_by_slug(conn, profile.id, category)?;
            let subcategory = NewSubCategory {
                category: &category,
                name,
            }
            .save(conn)?;

            println!("Subcategory created: {}", subcategory.slug);
        }
        SubcategoryCommands::Delete { slug, confirm: ok } => {
            if !ok || !confirm()? {
                anyhow::bail!("operation requires confirmation");
            }

            SubCategory::find_by_slug(conn, profile.id, slug)?.delete(conn)?;
            println!("Subcategory removed successfully.");
        }
    }

    Ok(())
}

#[derive(derive_more::From)]
struct BeneficiaryToDisplay(Beneficiary, BeneficiaryGroup);

impl Tabled for BeneficiaryToDisplay {
    const LENGTH: usize = 3;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.slug.to_string().into(),
            self.0.name.clone().into(),
            self.1.description.clone().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec!["slug".into(), "name".into(), "group".into()]
    }
}

pub fn beneficiary(config: &Config, command: &BeneficiaryCommands) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    match command {
        BeneficiaryCommands::List {} => {
            let beneficiaries = QueryBeneficiary {
                profile_id: profile.id,
                ..Default::default()
            }
            .run(conn)?
            .into_iter()
            .map(BeneficiaryToDisplay::from)
            .collect::<Vec<_>>();

            println!("{}", Table::new(beneficiaries));
        }
        BeneficiaryCommands::Groups {} => {
            for group in BeneficiaryGroup::all(conn, profile.id)? {
                println!("{} | {}", group.slug, group.description);
            }
        }
        BeneficiaryCommands::AddGroup { description } => {
            let group = NewBeneficiaryGroup {
                profile: &profile,
                description,
            }
            .save(conn)?;

            println!("Beneficiary group created: {}", group.slug);
        }
        BeneficiaryCommands::Create { name, group } => {
            let group = BeneficiaryGroup::find_by_slug(conn, profile.id, group)?;
            let beneficiary = NewBeneficiary {
                profile: &profile,
                group: &group,
                name,
            }
            .save(conn)?;

            println!("Beneficiary created: {}", beneficiary.slug);
        }
        BeneficiaryCommands::Delete { slug, confirm: ok } => {
            if !ok || !confirm()? {
                anyhow::bail!("operation requires confirmation");
            }

            Beneficiary::find_by_slug(conn, profile.id, slug)?.delete(conn)?;
            println!("Beneficiary removed successfully.");
        }
    }

    Ok(())
}

#[derive(derive_more::From)]
struct ClientToDisplay(Client);

impl Tabled for ClientToDisplay {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.slug.to_string().into(),
            self.0.name.clone().into(),
            self.0.city.clone().unwrap_or_default().into(),
            self.0.email.clone().unwrap_or_default().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec!["slug".into(), "name".into(), "city".into(), "email".into()]
    }
}

pub fn client(config: &Config, command: &ClientCommands) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    match command {
        ClientCommands::List {} => {
            let clients = QueryClient {
                profile_id: profile.id,
                ..Default::default()
            }
            .run(conn)?
            .into_iter()
            .map(ClientToDisplay::from)
            .collect::<Vec<_>>();

            println!("{}", Table::new(clients));
        }
        ClientCommands::Create {
            name,
            city,
            email,
            phone,
            contact,
        } => {
            let client = NewClient {
                city: city.as_deref(),
                email: email.as_deref(),
                phone: phone.as_deref(),
                contact: contact.as_deref(),
                ..NewClient::new(&profile, name)
            }
            .save(conn)?;

            println!("Client created: {}", client.slug);
        }
        ClientCommands::Delete { slug, confirm: ok } => {
            if !ok || !confirm()? {
                anyhow::bail!("operation requires confirmation");
            }

            Client::find_by_slug(conn, profile.id, slug)?.delete(conn)?;
            println!("Client removed successfully.");
        }
    }

    Ok(())
}

#[derive(derive_more::From)]
struct FinancialToDisplay(Financial);

impl Tabled for FinancialToDisplay {
    const LENGTH: usize = 5;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.slug.to_string().into(),
            self.0.kind.to_string().into(),
            self.0.label.clone().into(),
            self.0.branch.clone().unwrap_or_default().into(),
            self.0.number.clone().unwrap_or_default().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "slug".into(),
            "kind".into(),
            "label".into(),
            "branch".into(),
            "number".into(),
        ]
    }
}

pub fn financial(config: &Config, command: &FinancialCommands) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    match command {
        FinancialCommands::List { kind } => {
            let financials = QueryFinancial {
                profile_id: profile.id,
                kind: *kind,
                ..Default::default()
            }
            .run(conn)?
            .into_iter()
            .map(FinancialToDisplay::from)
            .collect::<Vec<_>>();

            println!("{}", Table::new(financials));
        }
        FinancialCommands::Create {
            label,
            kind,
            branch,
            number,
            description,
        } => {
            let financial = NewFinancial {
                profile: &profile,
                kind: *kind,
                label,
                branch: branch.as_deref(),
                number: number.as_deref(),
                description: description.as_deref(),
            }
            .save(conn)?;

            println!("Financial created: {}", financial.slug);
        }
        FinancialCommands::Delete { slug, confirm: ok } => {
            if !ok || !confirm()? {
                anyhow::bail!("operation requires confirmation");
            }

            // a slug is unique across both kinds, try them in turn
            let mut financial =
                match Financial::find_by_slug(conn, profile.id, FinancialKind::CostCenter, slug) {
                    Ok(financial) => financial,
                    Err(e) if e.is_resolution() => {
                        Financial::find_by_slug(conn, profile.id, FinancialKind::BankAccount, slug)?
                    }
                    Err(e) => return Err(e.into()),
                };
            financial.delete(conn)?;

            println!("Financial removed successfully.");
        }
    }

    Ok(())
}
