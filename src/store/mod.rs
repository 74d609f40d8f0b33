//! In-memory stores for users, companies, tenders and applications.
//!
//! Each store owns one ordered collection behind a `parking_lot::RwLock`.
//! Every operation is a linear scan finished inside a single lock
//! acquisition; no guard outlives the call, so none is held across an
//! `.await` in a handler.

mod applications;
mod companies;
mod page;
mod table;
mod tenders;
mod users;

use thiserror::Error;

pub use applications::{
    Application, ApplicationPatch, ApplicationStatus, ApplicationStore, NewApplication,
};
pub use companies::{Company, CompanyFilters, CompanyPatch, CompanyStore, NewCompany};
pub use page::{paginate, Page, PageInfo, PageRequest};
pub use tenders::{NewTender, Tender, TenderFilters, TenderPatch, TenderStatus, TenderStore};
pub use users::{NewUser, User, UserPatch, UserStore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("email already registered")]
    EmailTaken,
    #[error("user already owns a company")]
    CompanyExists,
    #[error("company already applied to this tender")]
    AlreadyApplied,
}

/// All four stores. Built once per process (or per test) and shared by `Arc`.
#[derive(Debug, Default)]
pub struct Db {
    pub users: UserStore,
    pub companies: CompanyStore,
    pub tenders: TenderStore,
    pub applications: ApplicationStore,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user and their company together. Both locks are held for the
    /// whole operation (users before companies), so a rejected registration
    /// leaves neither record behind.
    pub fn register_account(
        &self,
        user: NewUser,
        company: NewCompany,
    ) -> Result<(User, Company), StoreError> {
        let mut users = self.users.inner.write();
        let mut companies = self.companies.inner.write();
        let user = users::insert_unique(&mut users, user)?;
        let company = companies::insert_for_user(&mut companies, user.id, company)?;
        Ok((user, company))
    }

    /// Clear every collection and rewind every counter. Not safe while
    /// requests are in flight; used for startup fixtures and tests.
    pub fn reset(&self) {
        self.applications.reset();
        self.tenders.reset();
        self.companies.reset();
        self.users.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            username: "tester".into(),
            password_hash: "hash".into(),
        }
    }

    fn new_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.into(),
            industry: "Technology".into(),
            ..Default::default()
        }
    }

    #[test]
    fn register_account_links_company_to_user() {
        let db = Db::new();
        let (user, company) = db
            .register_account(new_user("a@example.com"), new_company("Acme"))
            .unwrap();
        assert_eq!(company.user_id, user.id);
        assert_eq!(db.companies.find_by_user_id(user.id).unwrap().id, company.id);
    }

    #[test]
    fn duplicate_email_creates_nothing() {
        let db = Db::new();
        db.register_account(new_user("a@example.com"), new_company("Acme"))
            .unwrap();
        let err = db
            .register_account(new_user("a@example.com"), new_company("Other"))
            .unwrap_err();
        assert_eq!(err, StoreError::EmailTaken);
        assert_eq!(db.users.len(), 1);
        assert_eq!(db.companies.len(), 1);
    }

    #[test]
    fn deleting_company_does_not_cascade() {
        let db = Db::new();
        let (_, company) = db
            .register_account(new_user("a@example.com"), new_company("Acme"))
            .unwrap();
        db.tenders.create(NewTender {
            company_id: company.id,
            title: "Website".into(),
            description: "Build a website".into(),
            budget: 100.0,
            deadline: time::macros::date!(2030 - 01 - 01),
            status: None,
        });
        assert!(db.companies.delete_by_id(company.id));
        assert_eq!(db.tenders.find_by_company_id(company.id).len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let db = Db::new();
        db.register_account(new_user("a@example.com"), new_company("Acme"))
            .unwrap();
        db.reset();
        assert_eq!(db.users.len(), 0);
        assert_eq!(db.companies.len(), 0);
        let (user, _) = db
            .register_account(new_user("b@example.com"), new_company("B"))
            .unwrap();
        assert_eq!(user.id, 1);
    }
}
