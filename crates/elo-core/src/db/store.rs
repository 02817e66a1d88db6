//! CRUD, search and export over one live connection

use std::path::{Path, PathBuf};

use sqlx::AnyConnection;
use sqlx::Connection;
use tracing::{debug, info};

use super::models::{
    Incident, IncidentField, Neighborhood, NewIncident, NewNeighborhood, NewUser, User,
};
use super::schema::Dialect;
use crate::error::{EloError, Result};
use crate::validation::{check_population_density, check_risk_ratio, require_date, require_non_empty};

/// File name written by [`Store::export_incidents_json`]
pub const EXPORT_FILE: &str = "incidents_export.json";

const INCIDENT_COLUMNS: &str =
    "id, title, description, category, date, status, location, user_id, neighborhood_id";

/// Result of an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub count: usize,
}

/// Data access for the incident register
pub struct Store {
    conn: AnyConnection,
}

impl Store {
    pub fn new(conn: AnyConnection) -> Self {
        Self { conn }
    }

    /// Create missing tables
    pub async fn migrate(&mut self) -> Result<()> {
        let backend = self.conn.backend_name().to_string();
        let dialect = Dialect::from_backend(&backend).ok_or_else(|| {
            EloError::SettingsError(format!("unsupported database backend: {}", backend))
        })?;

        for statement in dialect.create_statements() {
            sqlx::query(statement.as_str())
                .execute(&mut self.conn)
                .await?;
        }

        debug!("Schema ready on {}", backend);
        Ok(())
    }

    pub async fn list_users(&mut self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, role, email FROM users ORDER BY id")
            .fetch_all(&mut self.conn)
            .await?;
        Ok(users)
    }

    pub async fn create_user(&mut self, user: &NewUser) -> Result<i64> {
        require_non_empty("Name", &user.name)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, role, email) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user.name.as_str())
        .bind(user.role.as_str())
        .bind(user.email.as_str())
        .fetch_one(&mut self.conn)
        .await?;

        info!("Created user {} ({})", id, user.name);
        Ok(id)
    }

    pub async fn list_neighborhoods(&mut self) -> Result<Vec<Neighborhood>> {
        let neighborhoods = sqlx::query_as::<_, Neighborhood>(
            "SELECT id, name, risk_area_ratio, population_density FROM neighborhoods ORDER BY id",
        )
        .fetch_all(&mut self.conn)
        .await?;
        Ok(neighborhoods)
    }

    pub async fn create_neighborhood(&mut self, neighborhood: &NewNeighborhood) -> Result<i64> {
        require_non_empty("Name", &neighborhood.name)?;
        check_risk_ratio(neighborhood.risk_area_ratio)?;
        check_population_density(neighborhood.population_density)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO neighborhoods (name, risk_area_ratio, population_density) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(neighborhood.name.as_str())
        .bind(neighborhood.risk_area_ratio)
        .bind(neighborhood.population_density)
        .fetch_one(&mut self.conn)
        .await?;

        info!("Created neighborhood {} ({})", id, neighborhood.name);
        Ok(id)
    }

    pub async fn list_incidents(&mut self) -> Result<Vec<Incident>> {
        let query = format!("SELECT {} FROM incidents ORDER BY id", INCIDENT_COLUMNS);
        let incidents = sqlx::query_as::<_, Incident>(&query)
            .fetch_all(&mut self.conn)
            .await?;
        Ok(incidents)
    }

    /// Insert an incident. Unknown user or neighborhood ids are rejected by the database.
    pub async fn create_incident(&mut self, incident: &NewIncident) -> Result<i64> {
        require_non_empty("Title", &incident.title)?;
        require_date(&incident.date)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO incidents \
             (title, description, category, date, status, location, user_id, neighborhood_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(incident.title.as_str())
        .bind(incident.description.as_str())
        .bind(incident.category.as_str())
        .bind(incident.date.as_str())
        .bind(incident.status.as_str())
        .bind(incident.location.as_str())
        .bind(incident.user_id)
        .bind(incident.neighborhood_id)
        .fetch_one(&mut self.conn)
        .await?;

        info!("Created incident {} ({})", id, incident.title);
        Ok(id)
    }

    /// Incidents whose category matches, ignoring case and surrounding spaces.
    ///
    /// Folding happens here rather than in SQL because SQLite's `LOWER` only
    /// handles ASCII ("Incêndio" would not match "INCÊNDIO").
    pub async fn find_incidents_by_category(&mut self, category: &str) -> Result<Vec<Incident>> {
        let wanted = category.trim().to_lowercase();
        let incidents = self
            .list_incidents()
            .await?
            .into_iter()
            .filter(|incident| incident.category.trim().to_lowercase() == wanted)
            .collect();
        Ok(incidents)
    }

    /// Set one whitelisted column. `false` when no incident has that id.
    pub async fn update_incident(
        &mut self,
        id: i64,
        field: IncidentField,
        value: &str,
    ) -> Result<bool> {
        match field {
            IncidentField::Date => require_date(value)?,
            IncidentField::Title => require_non_empty("Title", value)?,
            _ => {}
        }

        // column name comes from the IncidentField whitelist
        let query = format!("UPDATE incidents SET {} = $1 WHERE id = $2", field.column());
        let result = sqlx::query(&query)
            .bind(value)
            .bind(id)
            .execute(&mut self.conn)
            .await?;

        let updated = result.rows_affected() > 0;
        debug!("Update of incident {} field {}: {}", id, field, updated);
        Ok(updated)
    }

    /// Remove an incident. `false` when no incident has that id.
    pub async fn delete_incident(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(&mut self.conn)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!("Delete of incident {}: {}", id, deleted);
        Ok(deleted)
    }

    /// Write every incident as a JSON array to `<dir>/incidents_export.json`
    pub async fn export_incidents_json(&mut self, dir: &Path) -> Result<ExportSummary> {
        let incidents = self.list_incidents().await?;
        let contents = serde_json::to_string_pretty(&incidents)?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(EXPORT_FILE);
        tokio::fs::write(&path, contents).await?;

        info!("Exported {} incidents to {:?}", incidents.len(), path);
        Ok(ExportSummary {
            path,
            count: incidents.len(),
        })
    }

    /// Close the underlying connection gracefully
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{Connector, Credentials, SqlConnector};
    use crate::crypto::SecretString;
    use tempfile::TempDir;

    async fn test_store() -> Store {
        let credentials = Credentials {
            username: String::new(),
            password: SecretString::new(""),
            connection_string: "sqlite::memory:".to_string(),
        };
        let conn = SqlConnector::new().connect(&credentials).await.unwrap();
        let mut store = Store::new(conn);
        store.migrate().await.unwrap();
        store
    }

    fn new_incident(category: &str, user_id: i64, neighborhood_id: i64) -> NewIncident {
        NewIncident {
            title: format!("{} na rua principal", category),
            description: "Água acima do meio-fio".to_string(),
            category: category.to_string(),
            date: "2024-05-03".to_string(),
            status: "aberta".to_string(),
            location: "Rua das Flores, 100".to_string(),
            user_id,
            neighborhood_id,
        }
    }

    /// Store with one user and one neighborhood; returns their ids
    async fn seeded_store() -> (Store, i64, i64) {
        let mut store = test_store().await;
        let user_id = store
            .create_user(&NewUser {
                name: "Ana Souza".to_string(),
                role: "prefeitura".to_string(),
                email: "ana@prefeitura.gov.br".to_string(),
            })
            .await
            .unwrap();
        let neighborhood_id = store
            .create_neighborhood(&NewNeighborhood {
                name: "Vila Nova".to_string(),
                risk_area_ratio: 0.35,
                population_density: 8200.5,
            })
            .await
            .unwrap();
        (store, user_id, neighborhood_id)
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let mut store = test_store().await;
        store.migrate().await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_users_and_neighborhoods() {
        let (mut store, user_id, neighborhood_id) = seeded_store().await;

        let users = store.list_users().await.unwrap();
        assert_eq!(
            users,
            vec![User {
                id: user_id,
                name: "Ana Souza".to_string(),
                role: "prefeitura".to_string(),
                email: "ana@prefeitura.gov.br".to_string(),
            }]
        );

        let neighborhoods = store.list_neighborhoods().await.unwrap();
        assert_eq!(neighborhoods.len(), 1);
        assert_eq!(neighborhoods[0].id, neighborhood_id);
        assert_eq!(neighborhoods[0].risk_area_ratio, 0.35);
        assert_eq!(neighborhoods[0].population_density, 8200.5);
    }

    #[tokio::test]
    async fn test_neighborhood_ranges_enforced() {
        let mut store = test_store().await;
        let result = store
            .create_neighborhood(&NewNeighborhood {
                name: "Centro".to_string(),
                risk_area_ratio: 1.5,
                population_density: 10.0,
            })
            .await;

        assert!(matches!(result, Err(EloError::ValidationError(_))));
        assert!(store.list_neighborhoods().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_incident_lifecycle() {
        let (mut store, user_id, neighborhood_id) = seeded_store().await;

        let id = store
            .create_incident(&new_incident("alagamento", user_id, neighborhood_id))
            .await
            .unwrap();

        let incidents = store.list_incidents().await.unwrap();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].id, id);
        assert_eq!(incidents[0].status, "aberta");

        assert!(store
            .update_incident(id, IncidentField::Status, "encerrada")
            .await
            .unwrap());
        assert_eq!(store.list_incidents().await.unwrap()[0].status, "encerrada");

        assert!(store.delete_incident(id).await.unwrap());
        assert!(store.list_incidents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_incident_reports_false() {
        let mut store = test_store().await;

        assert!(!store
            .update_incident(999, IncidentField::Title, "x")
            .await
            .unwrap());
        assert!(!store.delete_incident(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_bad_date_is_rejected() {
        let (mut store, user_id, neighborhood_id) = seeded_store().await;

        let mut incident = new_incident("alagamento", user_id, neighborhood_id);
        incident.date = "03/05/2024".to_string();
        assert!(store.create_incident(&incident).await.is_err());

        let id = store
            .create_incident(&new_incident("alagamento", user_id, neighborhood_id))
            .await
            .unwrap();
        let result = store.update_incident(id, IncidentField::Date, "2024-02-30").await;
        assert!(matches!(result, Err(EloError::ValidationError(_))));
        assert_eq!(store.list_incidents().await.unwrap()[0].date, "2024-05-03");
    }

    #[tokio::test]
    async fn test_unknown_references_are_rejected() {
        let (mut store, user_id, _) = seeded_store().await;

        let result = store
            .create_incident(&new_incident("alagamento", user_id, 4242))
            .await;
        assert!(matches!(result, Err(EloError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_search_by_category() {
        let (mut store, user_id, neighborhood_id) = seeded_store().await;
        for category in ["alagamento", "deslizamento", "Alagamento"] {
            store
                .create_incident(&new_incident(category, user_id, neighborhood_id))
                .await
                .unwrap();
        }

        let floods = store.find_incidents_by_category(" ALAGAMENTO ").await.unwrap();
        assert_eq!(floods.len(), 2);
        assert!(floods[0].id < floods[1].id);

        assert!(store
            .find_incidents_by_category("incêndio")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_accented_letters() {
        let (mut store, user_id, neighborhood_id) = seeded_store().await;
        store
            .create_incident(&new_incident("Incêndio", user_id, neighborhood_id))
            .await
            .unwrap();

        for query in ["incêndio", "INCÊNDIO", " Incêndio "] {
            let found = store.find_incidents_by_category(query).await.unwrap();
            assert_eq!(found.len(), 1, "{:?}", query);
            assert_eq!(found[0].category, "Incêndio");
        }
    }

    #[tokio::test]
    async fn test_export_json() {
        let (mut store, user_id, neighborhood_id) = seeded_store().await;
        store
            .create_incident(&new_incident("deslizamento", user_id, neighborhood_id))
            .await
            .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let export_dir = temp_dir.path().join("export");
        let summary = store.export_incidents_json(&export_dir).await.unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(summary.path, export_dir.join(EXPORT_FILE));

        let exported: Vec<Incident> =
            serde_json::from_str(&std::fs::read_to_string(&summary.path).unwrap()).unwrap();
        assert_eq!(exported, store.list_incidents().await.unwrap());
    }
}
