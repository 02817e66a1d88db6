//! Row types for users, neighborhoods and incidents

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::EloError;

/// Person responsible for incidents (city hall, NGO, admin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Neighborhood {
    pub id: i64,
    pub name: String,
    /// Share of the neighborhood classified as risk area, 0.0 to 1.0
    pub risk_area_ratio: f64,
    /// Inhabitants per square kilometre
    pub population_density: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNeighborhood {
    pub name: String,
    pub risk_area_ratio: f64,
    pub population_density: f64,
}

/// A reported occurrence (flood, landslide, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub status: String,
    pub location: String,
    pub user_id: i64,
    pub neighborhood_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: String,
    pub status: String,
    pub location: String,
    pub user_id: i64,
    pub neighborhood_id: i64,
}

/// Incident columns that may be edited after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentField {
    Title,
    Description,
    Category,
    Date,
    Status,
    Location,
}

impl IncidentField {
    pub const ALL: [IncidentField; 6] = [
        IncidentField::Title,
        IncidentField::Description,
        IncidentField::Category,
        IncidentField::Date,
        IncidentField::Status,
        IncidentField::Location,
    ];

    pub fn column(self) -> &'static str {
        match self {
            IncidentField::Title => "title",
            IncidentField::Description => "description",
            IncidentField::Category => "category",
            IncidentField::Date => "date",
            IncidentField::Status => "status",
            IncidentField::Location => "location",
        }
    }
}

impl fmt::Display for IncidentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for IncidentField {
    type Err = EloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.column() == wanted)
            .ok_or_else(|| EloError::ValidationError(format!("field '{}' cannot be updated", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_whitelist() {
        assert_eq!("Title".parse::<IncidentField>().unwrap(), IncidentField::Title);
        assert_eq!(" status ".parse::<IncidentField>().unwrap(), IncidentField::Status);

        for rejected in ["id", "user_id", "neighborhood_id", "title; DROP TABLE users", ""] {
            assert!(rejected.parse::<IncidentField>().is_err(), "accepted {:?}", rejected);
        }
    }
}
