pub use crate::schema::clients;
use crate::prelude::*;
use crate::profile::Profile;

use chrono::{offset::Utc, NaiveDateTime};
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Client {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub slug: Slug,
    pub city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        clients::table
            .find(id)
            .select(Client::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Client", None))
    }

    /// Resolve a slug to the active client it references
    pub fn find_by_slug(conn: &mut Conn, profile_id: i64, slug: &Slug) -> Result<Self> {
        clients::table
            .filter(clients::profile_id.eq(profile_id))
            .filter(clients::slug.eq(slug))
            .filter(clients::deleted_at.is_null())
            .select(Client::as_select())
            .first(conn)
            .map_err(|_| Error::Resolution("client"))
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("client is already deleted".to_owned()));
        }

        let now = Utc::now().naive_utc();
        diesel::update(&*self)
            .set(clients::deleted_at.eq(now))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

pub struct NewClient<'a> {
    pub profile: &'a Profile,
    pub name: &'a str,
    pub city: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub contact: Option<&'a str>,
}

impl<'a> NewClient<'a> {
    pub fn new(profile: &'a Profile, name: &'a str) -> Self {
        Self {
            profile,
            name,
            city: None,
            email: None,
            phone: None,
            contact: None,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Client> {
        if self.name.trim().is_empty() {
            return Err(Error::Invalid("client.name cannot be empty".to_owned()));
        }

        Ok(diesel::insert_into(clients::table)
            .values((
                clients::profile_id.eq(self.profile.id),
                clients::name.eq(self.name),
                clients::slug.eq(Slug::generate(self.name)),
                clients::city.eq(self.city),
                clients::email.eq(self.email),
                clients::phone.eq(self.phone),
                clients::contact.eq(self.contact),
            ))
            .returning(Client::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = clients)]
pub struct ChangeClient<'a> {
    pub name: Option<&'a str>,
    pub city: Option<Option<&'a str>>,
    pub email: Option<Option<&'a str>>,
    pub phone: Option<Option<&'a str>>,
    pub contact: Option<Option<&'a str>>,
}

impl ChangeClient<'_> {
    pub fn save(self, conn: &mut Conn, client: &Client) -> Result<()> {
        diesel::update(client).set(self).execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, client: &mut Client) -> Result<()> {
        self.clone().save(conn, client)?;

        if let Some(value) = self.name {
            client.name = value.to_string();
        }
        if let Some(value) = self.city {
            client.city = value.map(str::to_string);
        }
        if let Some(value) = self.email {
            client.email = value.map(str::to_string);
        }
        if let Some(value) = self.phone {
            client.phone = value.map(str::to_string);
        }
        if let Some(value) = self.contact {
            client.contact = value.map(str::to_string);
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct QueryClient {
    pub profile_id: i64,
    pub count: Option<i64>,
}

impl QueryClient {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Client>> {
        let mut query = clients::table
            .select(Client::as_select())
            .order(clients::name.asc())
            .into_boxed()
            .filter(clients::profile_id.eq(self.profile_id))
            .filter(clients::deleted_at.is_null());

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

        let client = NewClient {
            email: Some("billing@brightside.example"),
            ..NewClient::new(&profile, "Brightside Ltd")
        }
        .save(conn)?;
        assert_eq!("brightside-ltd", client.slug.as_str());

        let found = Client::find_by_slug(conn, profile.id, &client.slug)?;
        assert_eq!(Some("billing@brightside.example"), found.email.as_deref());
        assert_eq!(None, found.city);

        Ok(())
    }

    #[test]
    fn update_clears_fields() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;

        let mut client = NewClient {
            phone: Some("555-0100"),
            ..NewClient::new(&profile, "Brightside Ltd")
        }
        .save(conn)?;

        ChangeClient {
            city: Some(Some("Porto")),
            phone: Some(None),
            ..Default::default()
        }
        .apply(conn, &mut client)?;

        let reloaded = client.reload(conn)?;
        assert_eq!(Some("Porto"), reloaded.city.as_deref());
        assert_eq!(None, reloaded.phone);

        Ok(())
    }

    #[test]
    fn deleted_clients_are_not_listed() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;

        let mut gone = NewClient::new(&profile, "Acme").save(conn)?;
        NewClient::new(&profile, "Brightside").save(conn)?;
        gone.delete(conn)?;

        let listed = QueryClient {
            profile_id: profile.id,
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(1, listed.len());
        assert_eq!("Brightside", listed[0].name);

        assert!(matches!(
            Client::find_by_slug(conn, profile.id, &gone.slug),
            Err(Error::Resolution("client"))
        ));

        Ok(())
    }
}
