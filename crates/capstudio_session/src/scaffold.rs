//! Starter-project scaffolding.
//!
//! Seeds a fresh workspace with a minimal CAP project so the user lands in
//! something inspectable before the first generation run.

use std::str::FromStr;

use capstudio_tree::{path, FileSystemNode, ProjectTree};

/// Available starter templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTemplate {
    /// Sales order sample with entities, a service and handlers
    Basic,
    /// Bare skeleton with placeholder files
    Empty,
}

impl FromStr for ProjectTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "empty" => Ok(Self::Empty),
            other => Err(format!("unknown template '{}'", other)),
        }
    }
}

/// File opened in the editor right after scaffolding.
pub const DEFAULT_ACTIVE_FILE: &str = "/db/schema.cds";

/// Project name as a CDS namespace: lowercase, non-alphanumerics become `.`.
fn namespace_of(project: &str) -> String {
    project
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
        .collect()
}

/// Project name as an npm package name: lowercase, non-alphanumerics become
/// `-`.
fn package_name_of(project: &str) -> String {
    project
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Build the starter tree for a project.
pub fn starter_tree(project: &str, template: ProjectTemplate) -> ProjectTree {
    let namespace = namespace_of(project);
    let (schema, service, handlers) = match template {
        ProjectTemplate::Basic => (
            basic_schema(&namespace),
            basic_service(&namespace),
            BASIC_HANDLERS.to_string(),
        ),
        ProjectTemplate::Empty => (
            format!("namespace {};\n\n// Define your entities here\n", namespace),
            format!(
                "using {} as db from '../db/schema';\n\nservice MainService {{\n  // Define your service here\n}}",
                namespace
            ),
            EMPTY_HANDLERS.to_string(),
        ),
    };

    let mut tree = ProjectTree::new();
    for (file_path, content) in [
        ("/db/schema.cds", schema),
        ("/srv/service.cds", service),
        ("/srv/handlers.js", handlers),
        ("/package.json", package_json(project, &package_name_of(project))),
        ("/README.md", readme(project)),
    ] {
        let parent = path::parent_path(file_path);
        tree.ensure_folder_chain(&parent);
        tree.upsert_at(FileSystemNode::file(file_path, content), &parent);
    }
    tree
}

/// Output-log lines shown as the scaffolded project "starts up".
pub fn startup_output() -> Vec<String> {
    vec![
        "🚀 Starting CAPM application...".to_string(),
        "📦 Installing dependencies...".to_string(),
        "✅ Application started on http://localhost:4004".to_string(),
    ]
}

/// The welcome message greeting the user in a fresh project.
pub fn welcome_message(project: &str) -> String {
    format!(
        "Welcome to your new CAPM project \"{project}\"! 🎉\n\n\
         I've created a basic SAP CAPM project structure for you:\n\n\
         📁 **Database Layer** (/db/schema.cds)\n\
         - Entity definitions and data models\n\
         - Relationships and associations\n\n\
         📁 **Service Layer** (/srv/)\n\
         - service.cds: OData service definitions\n\
         - handlers.js: Business logic and event handlers\n\n\
         📁 **Configuration**\n\
         - package.json: Dependencies and scripts\n\
         - README.md: Project documentation\n\n\
         Just describe what you want to build and I'll generate complete, working code! 🚀"
    )
}

fn basic_schema(namespace: &str) -> String {
    format!(
        r#"namespace {namespace};

entity SalesOrder {{
  key ID: UUID;
  orderNumber: String(20) @mandatory;
  customer: Association to Customer;
  amount: Decimal(10,2);
  createdAt: DateTime @cds.on.insert: $now;
}}

entity Customer {{
  key ID: UUID;
  name: String(100) @mandatory;
  email: String(100);
  orders: Composition of many SalesOrder on orders.customer = $self;
}}"#
    )
}

fn basic_service(namespace: &str) -> String {
    format!(
        r#"using {namespace} as db from '../db/schema';

service SalesOrderService {{
  entity SalesOrders as projection on db.SalesOrder;
  entity Customers as projection on db.Customer;

  action createBulkOrders(orders: array of SalesOrders) returns array of SalesOrders;
}}"#
    )
}

const BASIC_HANDLERS: &str = r#"const cds = require('@sap/cds');

module.exports = cds.service.impl(async function() {
  const { SalesOrders } = this.entities;

  this.before('CREATE', 'SalesOrders', async (req) => {
    const { orderNumber } = req.data;
    if (!orderNumber) {
      req.error(400, 'Order number is required');
    }
  });

  this.on('createBulkOrders', async (req) => {
    const { orders } = req.data;
    const results = [];

    for (const order of orders) {
      const result = await INSERT.into(SalesOrders).entries(order);
      results.push(result);
    }

    return results;
  });
});"#;

const EMPTY_HANDLERS: &str = r#"const cds = require('@sap/cds');

module.exports = cds.service.impl(async function() {
  // Add your service handlers here
});"#;

fn package_json(project: &str, package: &str) -> String {
    format!(
        r#"{{
  "name": "{package}",
  "version": "1.0.0",
  "description": "SAP CAPM Application - {project}",
  "scripts": {{
    "start": "cds run",
    "watch": "cds watch",
    "build": "cds build",
    "deploy": "cds deploy"
  }},
  "dependencies": {{
    "@sap/cds": "^7.4.0",
    "@sap/cds-dk": "^7.4.0",
    "express": "^4.18.0"
  }}
}}"#
    )
}

fn readme(project: &str) -> String {
    format!(
        "# {project}\n\n\
         A SAP CAPM (Cloud Application Programming Model) application.\n\n\
         ## Getting Started\n\n\
         1. Install dependencies: `npm install`\n\
         2. Start the application: `npm start`\n\
         3. Open http://localhost:4004\n\n\
         ## Project Structure\n\n\
         - `db/` - Database schema and data models\n\
         - `srv/` - Service definitions and handlers\n\
         - `package.json` - Project configuration and dependencies\n"
    )
}
