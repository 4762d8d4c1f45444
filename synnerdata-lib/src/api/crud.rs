//! Create, Read, Update, Delete operations
//!
//! Every Synnerdata resource follows the same REST shape:
//!
//! | Operation | Request |
//! |---|---|
//! | list | `GET /{resource}` |
//! | list by company | `GET /{resource}/company/{company_id}` |
//! | get | `GET /{resource}/{id}` |
//! | create | `POST /{resource}` |
//! | update | `PUT /{resource}/{id}` |
//! | delete | `DELETE /{resource}/{id}` |
//!
//! # Example
//!
//! ```ignore
//! use synnerdata_lib::model::{Resource, Row};
//!
//! let rows = client.list_by_company(&Resource::Absences, company_id).await?;
//!
//! let created = client
//!     .create(&Resource::Departments, &Row::new().set("name", "RH"))
//!     .await?;
//! ```

use reqwest::Method;
use serde::Serialize;

use crate::SynnerdataClient;
use crate::error::Error;
use crate::model::Resource;
use crate::model::Row;

/// Request body for calls that send none.
const NO_BODY: Option<&()> = None;

impl SynnerdataClient {
    /// Lists every record of a resource visible to the session.
    pub async fn list(&self, resource: &Resource) -> Result<Vec<Row>, Error> {
        let rows: Option<Vec<Row>> = self
            .fetch_json(Method::GET, &format!("/{}", resource.path()), NO_BODY)
            .await?;
        Ok(rows.unwrap_or_default())
    }

    /// Lists the records of a resource that belong to one company.
    pub async fn list_by_company(
        &self,
        resource: &Resource,
        company_id: &str,
    ) -> Result<Vec<Row>, Error> {
        if !resource.is_company_scoped() {
            return Err(Error::InvalidOperation(format!(
                "{} is not listed per company",
                resource
            )));
        }
        let path = format!("/{}/company/{}", resource.path(), encode_segment(company_id)?);
        let rows: Option<Vec<Row>> = self.fetch_json(Method::GET, &path, NO_BODY).await?;
        Ok(rows.unwrap_or_default())
    }

    /// Fetches one record.
    pub async fn get(&self, resource: &Resource, id: &str) -> Result<Row, Error> {
        let path = record_path(resource, id)?;
        self.fetch_json(Method::GET, &path, NO_BODY).await
    }

    /// Creates a record and returns it as stored.
    pub async fn create<B>(&self, resource: &Resource, body: &B) -> Result<Row, Error>
    where
        B: Serialize + ?Sized,
    {
        let row: Option<Row> = self
            .fetch_json(Method::POST, &format!("/{}", resource.path()), Some(body))
            .await?;
        Ok(row.unwrap_or_default())
    }

    /// Updates a record and returns it as stored.
    pub async fn update<B>(&self, resource: &Resource, id: &str, body: &B) -> Result<Row, Error>
    where
        B: Serialize + ?Sized,
    {
        let path = record_path(resource, id)?;
        let row: Option<Row> = self.fetch_json(Method::PUT, &path, Some(body)).await?;
        Ok(row.unwrap_or_default())
    }

    /// Deletes a record.
    pub async fn delete(&self, resource: &Resource, id: &str) -> Result<(), Error> {
        let path = record_path(resource, id)?;
        self.fetch(Method::DELETE, &path, NO_BODY).await?;
        log::info!("deleted {} {}", resource, id);
        Ok(())
    }
}

fn record_path(resource: &Resource, id: &str) -> Result<String, Error> {
    Ok(format!("/{}/{}", resource.path(), encode_segment(id)?))
}

fn encode_segment(segment: &str) -> Result<String, Error> {
    let segment = segment.trim();
    if segment.is_empty() || segment.contains('/') {
        return Err(Error::InvalidOperation(format!(
            "invalid record id: {:?}",
            segment
        )));
    }
    Ok(segment.to_string())
}
