//! Relational storage for users, neighborhoods and incidents

mod models;
mod schema;
mod store;

pub use models::{
    Incident, IncidentField, Neighborhood, NewIncident, NewNeighborhood, NewUser, User,
};
pub use schema::Dialect;
pub use store::{ExportSummary, Store, EXPORT_FILE};
