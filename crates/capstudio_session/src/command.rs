//! Simulated terminal over the virtual tree.
//!
//! Each invocation is independent: the command line is echoed to the output
//! log, then dispatched case-insensitively. Read commands consult the tree
//! engine and never mutate run state; install/start/watch commands append
//! informational lines and flip the shared running flag.

use tokio::time::sleep;
use tracing::debug;

use capstudio_tree::{path, FileSystemNode};

use crate::session::WorkspaceSession;

const HELP_TEXT: &str = "Available commands:\n\
  help                 - Show this help message\n\
  ls [path]            - List files and directories\n\
  cat <file>           - Display file contents\n\
  npm install          - Install project dependencies\n\
  npm start            - Start the CAPM application\n\
  npm run watch        - Start in watch mode\n\
  npm run build        - Build the application\n\
  npm run deploy       - Deploy to SAP BTP\n\
  cds version          - Show CDS version\n\
  cds watch            - Start CDS in watch mode\n\
  cds deploy           - Deploy database schema\n\
  clear                - Clear terminal\n\
  pwd                  - Show current directory\n\
  tree                 - Show project structure";

impl WorkspaceSession {
    /// Execute one simulated command line.
    pub async fn terminal_command(&self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        self.append_output(format!("$ {}", trimmed)).await;
        debug!(command = trimmed, "dispatching terminal command");

        let args: Vec<&str> = trimmed.split_whitespace().collect();
        let cmd = args[0].to_lowercase();
        match cmd.as_str() {
            "help" => self.append_output(HELP_TEXT).await,
            "ls" => self.cmd_ls(args.get(1).copied()).await,
            "cat" => self.cmd_cat(args.get(1).copied()).await,
            "pwd" => self.append_output("/home/project").await,
            "tree" => self.cmd_tree().await,
            "clear" => self.state.write().await.output.clear(),
            "npm" => self.cmd_npm(&args[1..]).await,
            "cds" => self.cmd_cds(&args[1..]).await,
            other => {
                self.append_output(format!("✘ bash: {}: command not found", other))
                    .await
            }
        }
    }

    async fn cmd_ls(&self, arg: Option<&str>) {
        let line = {
            let s = self.state.read().await;
            let target = match arg {
                None | Some(".") | Some("/") => None,
                Some(p) => Some(path::normalize(p)),
            };
            match target {
                None => Some(listing_of(s.tree.roots())),
                Some(p) => s
                    .tree
                    .find_folder_by_path(&p)
                    .map(|folder| listing_of(&folder.children)),
            }
        };
        match (line, arg) {
            (Some(line), _) => self.append_output(line).await,
            (None, Some(p)) => {
                self.append_output(format!(
                    "ls: cannot access '{}': No such file or directory",
                    p
                ))
                .await
            }
            (None, None) => {}
        }
    }

    async fn cmd_cat(&self, arg: Option<&str>) {
        let Some(raw) = arg else {
            self.append_output("cat: missing file operand").await;
            return;
        };
        let file_path = path::normalize(raw);
        let content = {
            let s = self.state.read().await;
            s.tree
                .find_by_path(&file_path)
                .filter(|n| n.is_file())
                .map(|n| n.content.clone().unwrap_or_default())
        };
        match content {
            Some(content) if content.is_empty() => self.append_output("(empty file)").await,
            Some(content) => self.append_output(content).await,
            None => {
                self.append_output(format!("cat: {}: No such file or directory", raw))
                    .await
            }
        }
    }

    async fn cmd_tree(&self) {
        let rendered = {
            let s = self.state.read().await;
            render_tree(s.tree.roots(), "")
        };
        self.append_output(rendered.trim_end().to_string()).await;
    }

    async fn cmd_npm(&self, args: &[&str]) {
        match args {
            ["install", ..] => {
                self.append_output("📦 Installing dependencies...").await;
                self.emit_paced("✅ Dependencies installed successfully").await;
                self.append_output("Added 247 packages in 12.3s").await;
            }
            ["start", ..] => {
                self.append_output("🚀 Starting CAPM application...").await;
                self.emit_paced("📦 Loading CDS configuration...").await;
                self.emit_paced("🗄️  Connecting to database...").await;
                self.emit_paced("✅ Server started on http://localhost:4004").await;
                self.append_output("📊 Service endpoints:").await;
                self.append_output("  - /odata/v4/main/ (OData API)").await;
                self.append_output("  - /$metadata (Service metadata)").await;
                self.set_running().await;
            }
            ["run", "watch", ..] => {
                self.append_output("👀 Starting in watch mode...").await;
                self.emit_paced("✅ Watching for file changes...").await;
                self.set_running().await;
            }
            ["run", "build", ..] => {
                self.append_output("🔨 Building application...").await;
                self.emit_paced("✅ Build completed successfully").await;
                self.append_output("📁 Output written to ./dist/").await;
            }
            ["run", "deploy", ..] => {
                self.append_output("🚀 Deploying to SAP BTP...").await;
                self.emit_paced("✅ Deployment completed successfully").await;
            }
            _ => {
                self.append_output(format!("✘ npm: unknown command '{}'", args.join(" ")))
                    .await
            }
        }
    }

    async fn cmd_cds(&self, args: &[&str]) {
        match args {
            ["version", ..] => {
                self.append_output("@sap/cds: 7.4.0").await;
                self.append_output("@sap/cds-dk: 7.4.0").await;
                self.append_output("Node.js: v18.17.0").await;
            }
            ["watch", ..] => {
                self.append_output("👀 CDS watching for changes...").await;
                self.emit_paced("✅ Server ready at http://localhost:4004").await;
                self.set_running().await;
            }
            ["deploy", ..] => {
                self.append_output("🗄️  Deploying database schema...").await;
                self.emit_paced("✅ Database schema deployed successfully").await;
            }
            _ => {
                self.append_output(format!(
                    "✘ cds: unknown command '{}'",
                    args.first().unwrap_or(&"")
                ))
                .await
            }
        }
    }

    async fn emit_paced(&self, line: &str) {
        sleep(self.config.step_delay).await;
        self.append_output(line).await;
    }

    async fn set_running(&self) {
        self.state.write().await.is_running = true;
    }
}

/// One `ls`-style line: names in display order, folders suffixed `/`.
fn listing_of(nodes: &[FileSystemNode]) -> String {
    nodes
        .iter()
        .map(|n| {
            if n.is_folder() {
                format!("{}/", n.name)
            } else {
                n.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Box-drawing tree listing.
fn render_tree(nodes: &[FileSystemNode], prefix: &str) -> String {
    let mut out = String::new();
    for (index, node) in nodes.iter().enumerate() {
        let last = index == nodes.len() - 1;
        let connector = if last { "└── " } else { "├── " };
        let icon = if node.is_folder() { "📁 " } else { "📄 " };
        out.push_str(&format!("{}{}{}{}\n", prefix, connector, icon, node.name));

        if !node.children.is_empty() {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            out.push_str(&render_tree(&node.children, &child_prefix));
        }
    }
    out
}
