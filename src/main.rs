//! taskdesk - command-line dashboard for the task-assignment backend
//!
//! Signs in against the REST backend, keeps the issued tokens in a local
//! file, and renders the admin or worker board for the signed-in role.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use taskdesk::auth::{
    home_area, Area, Credentials, FileTokenStore, GuardOutcome, Identity, Session,
};
use taskdesk::config::Settings;
use taskdesk::domain::{
    FileType, PendingFile, StaffId, StaffMember, StaffProfile, StaffRoles, Task, TaskAction,
    TaskId, TaskStatus,
};
use taskdesk::view::{board_for, Board, StaffDraft, TaskDraft, TaskFilter, TaskStats};
use taskdesk::{logging, render, ClientError, Coordinator, HttpBackend};

#[derive(Parser)]
#[command(name = "taskdesk")]
#[command(about = "Task assignment dashboard for the command line")]
#[command(version)]
struct Cli {
    /// More log output on stderr (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the issued tokens
    Login {
        #[arg(short, long)]
        username: String,

        /// Password (prefer the environment variable over the flag)
        #[arg(short, long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored tokens
    Logout,

    /// Show who is signed in
    Whoami,

    /// Show the board for the signed-in role
    Board {
        /// Only tasks assigned to this staff member (admin board)
        #[arg(short, long)]
        assignee: Option<StaffId>,

        /// Only tasks in this status (admin board)
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },

    /// Show task counters
    Stats,

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Manage staff members
    #[command(subcommand)]
    Staff(StaffCommands),
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Show one task with its attachments
    Show { id: TaskId },

    /// Create a task
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long)]
        assignee: StaffId,

        /// Initial status (defaults to TODO)
        #[arg(short, long)]
        status: Option<TaskStatus>,

        #[command(flatten)]
        files: FileArgs,
    },

    /// Edit a task; files given here are added to its attachments
    Update {
        id: TaskId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        assignee: Option<StaffId>,

        #[arg(short, long)]
        status: Option<TaskStatus>,

        #[command(flatten)]
        files: FileArgs,
    },

    /// Delete a task
    Delete { id: TaskId },

    /// Move a pending task to TODO
    Start { id: TaskId },

    /// Mark a task as done
    Complete { id: TaskId },

    /// Approve a done task
    Approve { id: TaskId },

    /// Send a done task back
    Reject { id: TaskId },
}

#[derive(Args)]
struct FileArgs {
    /// Image to attach (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Video to attach (repeatable)
    #[arg(long = "video")]
    videos: Vec<PathBuf>,

    /// Audio file to attach (repeatable)
    #[arg(long = "audio")]
    audios: Vec<PathBuf>,
}

impl FileArgs {
    async fn attach(&self, draft: &mut TaskDraft) -> Result<()> {
        for (file_type, paths) in [
            (FileType::Image, &self.images),
            (FileType::Video, &self.videos),
            (FileType::Audio, &self.audios),
        ] {
            for path in paths {
                let file = PendingFile::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                draft.pick_files(file_type, [file]);
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum StaffCommands {
    /// List staff members
    List,

    /// Register a new staff member
    Create {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, env = "TASKDESK_STAFF_PASSWORD", hide_env_values = true)]
        password: String,

        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        roles: RoleArgs,
    },

    /// Edit a staff member; the password is kept unless given
    Update {
        id: StaffId,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        roles: RoleArgs,
    },

    /// Delete a staff member
    Delete { id: StaffId },
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    experience: Option<String>,

    #[arg(long)]
    education: Option<String>,

    #[arg(long)]
    bio: Option<String>,
}

impl ProfileArgs {
    fn apply(self, profile: &mut StaffProfile) {
        let fields = [
            (self.phone, &mut profile.phone_number),
            (self.address, &mut profile.address),
            (self.experience, &mut profile.experience),
            (self.education, &mut profile.education),
            (self.bio, &mut profile.bio),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

#[derive(Args)]
struct RoleArgs {
    #[arg(long)]
    programmer: Option<bool>,

    #[arg(long)]
    tester: Option<bool>,

    #[arg(long)]
    manager: Option<bool>,
}

impl RoleArgs {
    fn apply(&self, roles: &mut StaffRoles) {
        if let Some(v) = self.programmer {
            roles.is_programmer = v;
        }
        if let Some(v) = self.tester {
            roles.is_tester = v;
        }
        if let Some(v) = self.manager {
            roles.is_manager = v;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env, cli.verbose);

    tracing::debug!(
        env = ?settings.env,
        api_url = %settings.api_url,
        token_file = %settings.token_file.display(),
        "Starting taskdesk"
    );

    let tokens = Arc::new(FileTokenStore::new(settings.token_file.clone()));
    let session = Session::new(tokens.clone());
    session.restore();

    let backend = HttpBackend::new(
        settings.api_url.clone(),
        tokens,
        settings.request_timeout_seconds,
    )?;

    let app = App {
        settings,
        session,
        coordinator: Coordinator::new(backend),
    };
    app.run(cli.command).await
}

struct App {
    settings: Settings,
    session: Session,
    coordinator: Coordinator<HttpBackend>,
}

impl App {
    async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { username, password } => self.login(username, password).await,
            Commands::Logout => {
                self.session.logout();
                println!("Signed out.");
                Ok(())
            }
            Commands::Whoami => {
                self.whoami();
                Ok(())
            }
            Commands::Board { assignee, status } => {
                self.board(TaskFilter { assignee, status }).await
            }
            Commands::Stats => self.stats().await,
            Commands::Task(cmd) => self.task(cmd).await,
            Commands::Staff(cmd) => self.staff(cmd).await,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    async fn login(&self, username: String, password: String) -> Result<()> {
        let credentials = Credentials::new(username, password);
        let identity = self
            .session
            .login(self.coordinator.backend(), &credentials)
            .await
            .map_err(surface)?;

        let role = if identity.is_privileged {
            "administrator"
        } else {
            "staff member"
        };
        println!("Signed in as {} ({role}).", identity.display_name);
        Ok(())
    }

    fn whoami(&self) {
        match self.session.identity() {
            Some(identity) => {
                println!("{} ({})", identity.display_name, identity.username);
                println!(
                    "Role: {}",
                    if identity.is_privileged {
                        "administrator"
                    } else {
                        "staff member"
                    }
                );
                if let Some(phone) = &identity.phone_number {
                    println!("Phone: {phone}");
                }
            }
            None => println!("Not signed in."),
        }
    }

    fn signed_in(&self) -> Result<Identity> {
        self.session
            .identity()
            .context("Not signed in. Run `taskdesk login` first.")
    }

    fn require_admin(&self) -> Result<Identity> {
        match self.session.guard(Area::Admin) {
            GuardOutcome::Render => self.signed_in(),
            GuardOutcome::RedirectToLogin => bail!("Not signed in. Run `taskdesk login` first."),
            GuardOutcome::Redirect(_) => bail!("This command is only available to administrators"),
            GuardOutcome::Loading => bail!("Session is not ready"),
        }
    }

    // =========================================================================
    // Boards
    // =========================================================================

    async fn board(&self, filter: TaskFilter) -> Result<()> {
        let identity = self.signed_in()?;
        let area = home_area(&identity);
        if self.session.guard(area) != GuardOutcome::Render {
            bail!("Session is not ready");
        }

        // The staff listing is an admin-only resource
        let loaded = match area {
            Area::Admin => self.coordinator.load().await,
            Area::Worker => self.coordinator.refresh_tasks().await,
        };
        loaded.map_err(surface)?;

        let snapshot = self.coordinator.snapshot();
        let (tasks, staff) = (snapshot.tasks(), snapshot.staff());
        let origin = self.settings.origin();

        let out = match board_for(&identity, &tasks, &staff, filter) {
            Board::Admin(board) => render::admin_board(&board, &origin),
            Board::Worker(board) => render::worker_board(&board, &origin),
        };
        println!("{out}");
        Ok(())
    }

    async fn stats(&self) -> Result<()> {
        self.require_admin()?;
        self.coordinator.load().await.map_err(surface)?;

        let snapshot = self.coordinator.snapshot();
        println!("{}", render::stats_line(&TaskStats::from_tasks(&snapshot.tasks())));
        println!("Staff: {}", snapshot.staff().len());
        Ok(())
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    async fn task(&self, cmd: TaskCommands) -> Result<()> {
        match cmd {
            TaskCommands::Show { id } => {
                let identity = self.signed_in()?;
                self.coordinator.refresh_tasks().await.map_err(surface)?;
                let tasks = self.coordinator.snapshot().tasks();
                let task = find_task(&tasks, id)?;
                println!(
                    "{}",
                    render::task_details(task, &self.settings.origin(), identity.is_privileged)
                );
                Ok(())
            }

            TaskCommands::Create {
                title,
                description,
                assignee,
                status,
                files,
            } => {
                self.require_admin()?;
                let mut draft = TaskDraft::new();
                draft.title = title;
                draft.description = description;
                draft.assignee_id = Some(assignee);
                if let Some(status) = status {
                    draft.status = status;
                }
                files.attach(&mut draft).await?;

                let command = draft.submit()?;
                self.coordinator
                    .submit_task(&command)
                    .await
                    .map_err(surface)?;
                println!("Task created.");
                Ok(())
            }

            TaskCommands::Update {
                id,
                title,
                description,
                assignee,
                status,
                files,
            } => {
                self.require_admin()?;
                self.coordinator.refresh_tasks().await.map_err(surface)?;
                let tasks = self.coordinator.snapshot().tasks();
                let mut draft = TaskDraft::edit(find_task(&tasks, id)?);

                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                if assignee.is_some() {
                    draft.assignee_id = assignee;
                }
                if let Some(status) = status {
                    draft.status = status;
                }
                files.attach(&mut draft).await?;

                let command = draft.submit()?;
                self.coordinator
                    .submit_task(&command)
                    .await
                    .map_err(surface)?;
                println!("Task #{id} updated.");
                Ok(())
            }

            TaskCommands::Delete { id } => {
                self.require_admin()?;
                self.coordinator.delete_task(id).await.map_err(surface)?;
                println!("Task #{id} deleted.");
                Ok(())
            }

            TaskCommands::Start { id } => self.transition(id, TaskAction::Start).await,
            TaskCommands::Complete { id } => self.transition(id, TaskAction::Complete).await,
            TaskCommands::Approve { id } => {
                self.require_admin()?;
                self.transition(id, TaskAction::Approve).await
            }
            TaskCommands::Reject { id } => {
                self.require_admin()?;
                self.transition(id, TaskAction::Reject).await
            }
        }
    }

    async fn transition(&self, id: TaskId, action: TaskAction) -> Result<()> {
        self.signed_in()?;
        self.coordinator
            .transition(id, action)
            .await
            .map_err(surface)?;
        println!("Task #{id} is now {}.", action.target_status());
        Ok(())
    }

    // =========================================================================
    // Staff
    // =========================================================================

    async fn staff(&self, cmd: StaffCommands) -> Result<()> {
        self.require_admin()?;

        match cmd {
            StaffCommands::List => {
                self.coordinator.refresh_staff().await.map_err(surface)?;
                println!("{}", render::staff_list(&self.coordinator.snapshot().staff()));
                Ok(())
            }

            StaffCommands::Create {
                first_name,
                last_name,
                password,
                profile,
                roles,
            } => {
                let mut draft = StaffDraft::new();
                draft.first_name = first_name;
                draft.last_name = last_name;
                draft.password = password;
                profile.apply(&mut draft.profile);
                roles.apply(&mut draft.roles);

                let command = draft.submit()?;
                self.coordinator
                    .submit_staff(&command)
                    .await
                    .map_err(surface)?;
                println!("Staff member created.");
                Ok(())
            }

            StaffCommands::Update {
                id,
                first_name,
                last_name,
                password,
                profile,
                roles,
            } => {
                self.coordinator.refresh_staff().await.map_err(surface)?;
                let staff = self.coordinator.snapshot().staff();
                let mut draft = StaffDraft::edit(find_member(&staff, id)?);

                if let Some(first_name) = first_name {
                    draft.first_name = first_name;
                }
                if let Some(last_name) = last_name {
                    draft.last_name = last_name;
                }
                if let Some(password) = password {
                    draft.password = password;
                }
                profile.apply(&mut draft.profile);
                roles.apply(&mut draft.roles);

                let command = draft.submit()?;
                self.coordinator
                    .submit_staff(&command)
                    .await
                    .map_err(surface)?;
                println!("Staff member #{id} updated.");
                Ok(())
            }

            StaffCommands::Delete { id } => {
                self.coordinator.delete_staff(id).await.map_err(surface)?;
                println!("Staff member #{id} deleted.");
                Ok(())
            }
        }
    }
}

fn find_task(tasks: &[Task], id: TaskId) -> Result<&Task> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .with_context(|| format!("No task with id {id}"))
}

fn find_member(staff: &[StaffMember], id: StaffId) -> Result<&StaffMember> {
    staff
        .iter()
        .find(|m| m.id == id)
        .with_context(|| format!("No staff member with id {id}"))
}

/// Log the details and hand the user only the public message.
fn surface(e: ClientError) -> anyhow::Error {
    tracing::debug!(error = ?e, kind = ?e.kind(), "Command failed");
    anyhow!(e.public_message())
}
