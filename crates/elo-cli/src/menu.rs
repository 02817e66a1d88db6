//! Main menu loop

use std::io;
use std::path::PathBuf;

use elo_core::validation::{parse_id, parse_population_density, parse_risk_ratio, validate_date};
use elo_core::{EloError, IncidentField, NewIncident, NewNeighborhood, NewUser, Store};
use tracing::{info, warn};

use crate::console::Console;
use crate::render::{render_table, Tabular};

/// Entries of the main menu, in display order (option 1 first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    CreateUser,
    ListNeighborhoods,
    CreateNeighborhood,
    ListIncidents,
    CreateIncident,
    SearchIncidents,
    UpdateIncident,
    DeleteIncident,
    ExportIncidents,
}

impl Action {
    pub const MENU: [Action; 10] = [
        Action::ListUsers,
        Action::CreateUser,
        Action::ListNeighborhoods,
        Action::CreateNeighborhood,
        Action::ListIncidents,
        Action::CreateIncident,
        Action::SearchIncidents,
        Action::UpdateIncident,
        Action::DeleteIncident,
        Action::ExportIncidents,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::ListUsers => "List users",
            Action::CreateUser => "Create user",
            Action::ListNeighborhoods => "List neighborhoods",
            Action::CreateNeighborhood => "Create neighborhood",
            Action::ListIncidents => "List incidents",
            Action::CreateIncident => "Create incident",
            Action::SearchIncidents => "Search incidents by category",
            Action::UpdateIncident => "Update incident",
            Action::DeleteIncident => "Delete incident",
            Action::ExportIncidents => "Export incidents to JSON",
        }
    }
}

/// What the user picked on the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Exit,
    Run(Action),
    NotANumber,
    OutOfRange(u32),
}

/// Empty input picks the default, `0` (exit)
pub fn parse_choice(input: &str) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Exit;
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Choice::NotANumber;
    }

    match input.parse::<u32>() {
        Ok(0) => Choice::Exit,
        Ok(n) => Action::MENU
            .get(n as usize - 1)
            .map_or(Choice::OutOfRange(n), |action| Choice::Run(*action)),
        Err(_) => Choice::OutOfRange(u32::MAX),
    }
}

pub struct Menu<'a, C: Console + ?Sized> {
    console: &'a C,
    store: &'a mut Store,
    export_dir: PathBuf,
}

impl<'a, C: Console + ?Sized> Menu<'a, C> {
    pub fn new(console: &'a C, store: &'a mut Store, export_dir: PathBuf) -> Self {
        Self {
            console,
            store,
            export_dir,
        }
    }

    /// Show the menu until the user exits. Returns early only when input fails.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.console.clear();
            self.console.panel("ELO", "Welcome to ELO!");
            self.console.rule("Main menu");
            for (i, action) in Action::MENU.iter().enumerate() {
                self.console.option(&(i + 1).to_string(), action.label());
            }
            self.console.option("0", "Exit");

            let input = self.console.ask("Choose an option [0]")?;
            match parse_choice(&input) {
                Choice::Exit => {
                    info!("User closed the program");
                    self.console.info("Leaving... see you soon!");
                    break;
                }
                Choice::NotANumber => {
                    warn!("Non-numeric menu option: {:?}", input);
                    self.console
                        .error("Invalid option (type a number). Try again.");
                }
                Choice::OutOfRange(_) => {
                    warn!("Menu option out of range: {:?}", input);
                    self.console
                        .error("Invalid option. Type a number between 0 and 10.");
                }
                Choice::Run(action) => {
                    info!("User chose: {}", action.label());
                    self.dispatch(action).await?;
                }
            }
            self.console.pause()?;
        }

        Ok(())
    }

    async fn dispatch(&mut self, action: Action) -> io::Result<()> {
        match action {
            Action::ListUsers => {
                self.console.loading("Loading users...");
                let rows = self.store.list_users().await;
                self.show(rows, "No users found.");
            }
            Action::CreateUser => self.create_user().await?,
            Action::ListNeighborhoods => {
                self.console.loading("Loading neighborhoods...");
                let rows = self.store.list_neighborhoods().await;
                self.show(rows, "No neighborhoods found.");
            }
            Action::CreateNeighborhood => self.create_neighborhood().await?,
            Action::ListIncidents => {
                self.console.loading("Loading incidents...");
                let rows = self.store.list_incidents().await;
                self.show(rows, "No incidents found.");
            }
            Action::CreateIncident => self.create_incident().await?,
            Action::SearchIncidents => self.search_incidents().await?,
            Action::UpdateIncident => self.update_incident().await?,
            Action::DeleteIncident => self.delete_incident().await?,
            Action::ExportIncidents => self.export_incidents().await,
        }
        Ok(())
    }

    fn show<T: Tabular>(&self, rows: elo_core::Result<Vec<T>>, empty_message: &str) {
        match rows {
            Ok(rows) if rows.is_empty() => self.console.warning(empty_message),
            Ok(rows) => self.console.print(&render_table(&rows)),
            Err(e) => self.fail("Error loading data", &e),
        }
    }

    fn fail(&self, context: &str, err: &EloError) {
        self.console.error(&format!("{}: {}", context, err));
    }

    async fn create_user(&mut self) -> io::Result<()> {
        self.console.panel("New user", "Create a new user");
        let user = NewUser {
            name: self.console.ask("Name")?,
            role: self.console.ask("Role (prefeitura, ong, admin)")?,
            email: self.console.ask("E-mail")?,
        };

        match self.store.create_user(&user).await {
            Ok(id) => self.console.success(&format!("User created with ID {}", id)),
            Err(e) => self.fail("Error creating user", &e),
        }
        Ok(())
    }

    async fn create_neighborhood(&mut self) -> io::Result<()> {
        self.console.panel("New neighborhood", "Create a new neighborhood");
        let name = self.console.ask("Neighborhood name")?;

        let risk_area_ratio =
            match parse_risk_ratio(&self.console.ask("Risk area ratio (0.0 to 1.0)")?) {
                Ok(value) => value,
                Err(e) => {
                    self.fail("Invalid value for risk area ratio", &e);
                    return Ok(());
                }
            };
        let population_density = match parse_population_density(
            &self.console.ask("Population density (inhabitants/km²)")?,
        ) {
            Ok(value) => value,
            Err(e) => {
                self.fail("Invalid value for population density", &e);
                return Ok(());
            }
        };

        let neighborhood = NewNeighborhood {
            name,
            risk_area_ratio,
            population_density,
        };
        match self.store.create_neighborhood(&neighborhood).await {
            Ok(id) => self
                .console
                .success(&format!("Neighborhood created with ID {}", id)),
            Err(e) => self.fail("Error creating neighborhood", &e),
        }
        Ok(())
    }

    async fn create_incident(&mut self) -> io::Result<()> {
        self.console.panel("New incident", "Create a new incident");
        let title = self.console.ask("Title")?;
        let description = self.console.ask("Description")?;
        let category = self.console.ask("Category (e.g. flood, landslide)")?;
        let date = self.console.ask("Date (YYYY-MM-DD)")?;
        if !validate_date(&date) {
            self.console.error("Invalid date format. Use YYYY-MM-DD.");
            return Ok(());
        }
        let status = self.console.ask("Status (e.g. open, in progress, closed)")?;
        let location = self.console.ask("Location (description or landmark)")?;

        let user_id = self.console.ask("Responsible user ID")?;
        let neighborhood_id = self.console.ask("Affected neighborhood ID")?;
        let (user_id, neighborhood_id) = match (parse_id(&user_id), parse_id(&neighborhood_id)) {
            (Ok(user_id), Ok(neighborhood_id)) => (user_id, neighborhood_id),
            (Err(e), _) | (_, Err(e)) => {
                self.fail("Invalid ID, it must be a whole number", &e);
                return Ok(());
            }
        };

        let incident = NewIncident {
            title,
            description,
            category,
            date,
            status,
            location,
            user_id,
            neighborhood_id,
        };
        match self.store.create_incident(&incident).await {
            Ok(id) => self.console.success(&format!("Incident created with ID {}", id)),
            Err(e) => self.fail("Error creating incident", &e),
        }
        Ok(())
    }

    async fn search_incidents(&mut self) -> io::Result<()> {
        self.console
            .panel("Search incidents", "Search incidents by category");
        let category = self.console.ask("Category")?;

        let rows = self.store.find_incidents_by_category(&category).await;
        self.show(
            rows,
            &format!("No incidents found in category '{}'.", category),
        );
        Ok(())
    }

    fn ask_id(&self, label: &str) -> io::Result<Option<i64>> {
        match parse_id(&self.console.ask(label)?) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                self.fail("Invalid ID, it must be a whole number", &e);
                Ok(None)
            }
        }
    }

    async fn update_incident(&mut self) -> io::Result<()> {
        self.console
            .panel("Update incident", "Update an existing incident");
        let Some(id) = self.ask_id("ID of the incident to update")? else {
            return Ok(());
        };

        let field = match self
            .console
            .ask("Field to update (title, description, category, date, status, location)")?
            .parse::<IncidentField>()
        {
            Ok(field) => field,
            Err(e) => {
                self.fail("Invalid or forbidden field", &e);
                return Ok(());
            }
        };

        let value = self.console.ask("New value")?;
        if field == IncidentField::Date && !validate_date(&value) {
            self.console.error("Invalid date format. Use YYYY-MM-DD.");
            return Ok(());
        }

        match self.store.update_incident(id, field, &value).await {
            Ok(true) => self
                .console
                .success(&format!("Incident {} updated.", id)),
            Ok(false) => self.console.error("Incident not found."),
            Err(e) => self.fail("Error updating incident", &e),
        }
        Ok(())
    }

    async fn delete_incident(&mut self) -> io::Result<()> {
        self.console
            .panel("Delete incident", "Delete an existing incident");
        let Some(id) = self.ask_id("ID of the incident to delete")? else {
            return Ok(());
        };

        match self.store.delete_incident(id).await {
            Ok(true) => self
                .console
                .success(&format!("Incident {} deleted.", id)),
            Ok(false) => self.console.error("Incident not found."),
            Err(e) => self.fail("Error deleting incident", &e),
        }
        Ok(())
    }

    async fn export_incidents(&mut self) {
        self.console
            .panel("Export", "Export incidents to JSON");
        match self.store.export_incidents_json(&self.export_dir).await {
            Ok(summary) => self.console.success(&format!(
                "Exported {} incidents to {}",
                summary.count,
                summary.path.display()
            )),
            Err(e) => self.fail("Export failed", &e),
        }
    }
}
