pub use crate::schema::{beneficiaries, beneficiary_groups};
use crate::prelude::*;
use crate::profile::Profile;

use chrono::{offset::Utc, NaiveDateTime};
use diesel::prelude::*;

/// Grouping label under which beneficiaries are listed
#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = beneficiary_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BeneficiaryGroup {
    pub id: i64,
    pub profile_id: i64,
    pub description: String,
    pub slug: Slug,
    pub deleted_at: Option<NaiveDateTime>,
}

impl BeneficiaryGroup {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        beneficiary_groups::table
            .find(id)
            .select(BeneficiaryGroup::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "BeneficiaryGroup", None))
    }

    pub fn find_by_slug(conn: &mut Conn, profile_id: i64, slug: &Slug) -> Result<Self> {
        beneficiary_groups::table
            .filter(beneficiary_groups::profile_id.eq(profile_id))
            .filter(beneficiary_groups::slug.eq(slug))
            .filter(beneficiary_groups::deleted_at.is_null())
            .select(BeneficiaryGroup::as_select())
            .first(conn)
            .map_err(|_| Error::Resolution("beneficiary group"))
    }

    pub fn all(conn: &mut Conn, profile_id: i64) -> Result<Vec<Self>> {
        Ok(beneficiary_groups::table
            .filter(beneficiary_groups::profile_id.eq(profile_id))
            .filter(beneficiary_groups::deleted_at.is_null())
            .order(beneficiary_groups::description.asc())
            .select(BeneficiaryGroup::as_select())
            .load(conn)?)
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("beneficiary group is already deleted".to_owned()));
        }

        let now = Utc::now().naive_utc();
        diesel::update(&*self)
            .set(beneficiary_groups::deleted_at.eq(now))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

pub struct NewBeneficiaryGroup<'a> {
    pub profile: &'a Profile,
    pub description: &'a str,
}

impl NewBeneficiaryGroup<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<BeneficiaryGroup> {
        if self.description.trim().is_empty() {
            return Err(Error::Invalid(
                "beneficiary_group.description cannot be empty".to_owned(),
            ));
        }

        Ok(diesel::insert_into(beneficiary_groups::table)
            .values((
                beneficiary_groups::profile_id.eq(self.profile.id),
                beneficiary_groups::description.eq(self.description),
                beneficiary_groups::slug.eq(Slug::generate(self.description)),
            ))
            .returning(BeneficiaryGroup::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = beneficiaries)]
#[diesel(belongs_to(BeneficiaryGroup, foreign_key = group_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Beneficiary {
    pub id: i64,
    pub profile_id: i64,
    pub group_id: i64,
    pub name: String,
    pub slug: Slug,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Beneficiary {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        beneficiaries::table
            .find(id)
            .select(Beneficiary::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Beneficiary", None))
    }

    /// Resolve a slug to the active beneficiary it references
    pub fn find_by_slug(conn: &mut Conn, profile_id: i64, slug: &Slug) -> Result<Self> {
        beneficiaries::table
            .filter(beneficiaries::profile_id.eq(profile_id))
            .filter(beneficiaries::slug.eq(slug))
            .filter(beneficiaries::deleted_at.is_null())
            .select(Beneficiary::as_select())
            .first(conn)
            .map_err(|_| Error::Resolution("beneficiary"))
    }

    pub fn fetch_group(&self, conn: &mut Conn) -> Result<BeneficiaryGroup> {
        BeneficiaryGroup::find(conn, self.group_id)
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("beneficiary is already deleted".to_owned()));
        }

        let now = Utc::now().naive_utc();
        diesel::update(&*self)
            .set(beneficiaries::deleted_at.eq(now))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

pub struct NewBeneficiary<'a> {
    pub profile: &'a Profile,
    pub group: &'a BeneficiaryGroup,
    pub name: &'a str,
}

impl NewBeneficiary<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Beneficiary> {
        if self.name.trim().is_empty() {
            return Err(Error::Invalid("beneficiary.name cannot be empty".to_owned()));
        }
        if !self.group.is_active() || self.group.profile_id != self.profile.id {
            return Err(Error::Resolution("beneficiary group"));
        }

        Ok(diesel::insert_into(beneficiaries::table)
            .values((
                beneficiaries::profile_id.eq(self.profile.id),
                beneficiaries::group_id.eq(self.group.id),
                beneficiaries::name.eq(self.name),
                beneficiaries::slug.eq(Slug::generate(self.name)),
            ))
            .returning(Beneficiary::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default)]
pub struct QueryBeneficiary {
    pub profile_id: i64,
    pub group_id: Option<i64>,
    pub count: Option<i64>,
}

impl QueryBeneficiary {
    /// Active beneficiaries sorted by group description, then name
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<(Beneficiary, BeneficiaryGroup)>> {
        let mut query = beneficiaries::table
            .inner_join(beneficiary_groups::table)
            .select((Beneficiary::as_select(), BeneficiaryGroup::as_select()))
            .order((
                beneficiary_groups::description.asc(),
                beneficiaries::name.asc(),
            ))
            .into_boxed()
            .filter(beneficiaries::profile_id.eq(self.profile_id))
            .filter(beneficiaries::deleted_at.is_null());

        if let Some(group_id) = self.group_id {
            query = query.filter(beneficiaries::group_id.eq(group_id));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query.load(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create_then_resolve() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let group = test::beneficiary_group(conn, &profile, "Suppliers")?;

        let beneficiary = NewBeneficiary {
            profile: &profile,
            group: &group,
            name: "Acme Paper",
        }
        .save(conn)?;
        assert_eq!("acme-paper", beneficiary.slug.as_str());

        let found = Beneficiary::find_by_slug(conn, profile.id, &beneficiary.slug)?;
        assert_eq!(beneficiary.id, found.id);
        assert_eq!(group.id, found.fetch_group(conn)?.id);

        Ok(())
    }

    #[test]
    fn group_must_be_active_and_owned() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let other = test::profile(conn, "rupert")?;
        let mut group = test::beneficiary_group(conn, &profile, "Suppliers")?;

        let result = NewBeneficiary {
            profile: &other,
            group: &group,
            name: "Acme Paper",
        }
        .save(conn);
        assert!(matches!(result, Err(Error::Resolution("beneficiary group"))));

        group.delete(conn)?;
        let result = NewBeneficiary {
            profile: &profile,
            group: &group,
            name: "Acme Paper",
        }
        .save(conn);
        assert!(matches!(result, Err(Error::Resolution("beneficiary group"))));

        Ok(())
    }

    #[test]
    fn listing_sorts_by_group_then_name() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let suppliers = test::beneficiary_group(conn, &profile, "Suppliers")?;
        let staff = test::beneficiary_group(conn, &profile, "Staff")?;

        for (group, name) in [
            (&suppliers, "Acme Paper"),
            (&staff, "Wanda"),
            (&suppliers, "Zephyr Logistics"),
            (&staff, "Milo"),
        ] {
            NewBeneficiary { profile: &profile, group, name }.save(conn)?;
        }

        let mut deleted = Beneficiary::find_by_slug(conn, profile.id, &Slug::generate("Milo"))?;
        deleted.delete(conn)?;

        let listed = QueryBeneficiary {
            profile_id: profile.id,
            ..Default::default()
        }
        .run(conn)?;

        assert_eq!(
            vec!["Wanda", "Acme Paper", "Zephyr Logistics"],
            listed.iter().map(|(b, _)| b.name.as_str()).collect::<Vec<_>>()
        );

        Ok(())
    }
}
