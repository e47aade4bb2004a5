use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gemelli_client::api::{NewBackup, NewDevice, NewTicket, TicketChanges};
use gemelli_client::screens::{
    BackupsScreen, BannerKind, BannerSlot, DevicesScreen, Outcome, PermissionsScreen, UsersScreen,
};
use gemelli_client::session::SessionManager;
use gemelli_client::token_store::{FileTokenStore, TokenStore, ACCESS_TOKEN_KEY};
use gemelli_client::ApiClient;
use gemelli_core::backup::{BackupType, StorageKind};
use gemelli_core::inventory::{DeviceStatus, DeviceType};
use gemelli_core::roles::Role;
use gemelli_core::ticket::{TicketPriority, TicketStatus};
use uuid::Uuid;

/// Command-line administration for Gemelli IT.
#[derive(Debug, Parser)]
#[command(name = "gemelli-admin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Passwords for new or reset accounts come from here rather than argv.
const NEW_PASSWORD_ENV: &str = "GEMELLI_NEW_PASSWORD";

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the access token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GEMELLI_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Revoke the session and forget the token.
    Logout,
    /// Show the signed-in profile.
    Whoami,
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Devices(DevicesCommand),
    #[command(subcommand)]
    Backups(BackupsCommand),
    #[command(subcommand)]
    Permissions(PermissionsCommand),
    #[command(subcommand)]
    Tickets(TicketsCommand),
    /// Device, ticket and backup counters.
    Dashboard,
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    List,
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        email: String,
        /// Initial password; prefer the environment variable.
        #[arg(long, env = NEW_PASSWORD_ENV, hide_env_values = true)]
        password: String,
        #[arg(long, value_parser = parse_role, default_value = "DOCENTE")]
        rol: Role,
        #[arg(long)]
        org_unit: Option<Uuid>,
        #[arg(long)]
        inactive: bool,
    },
    SetRole {
        id: Uuid,
        #[arg(value_parser = parse_role)]
        rol: Role,
    },
    /// Omit the org unit to clear it.
    SetOrgUnit { id: Uuid, org_unit: Option<Uuid> },
    Toggle { id: Uuid },
    ResetPassword {
        id: Uuid,
        #[arg(long, env = NEW_PASSWORD_ENV, hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Subcommand)]
enum DevicesCommand {
    List {
        /// Case-insensitive match on name or location.
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        estado: Option<DeviceStatus>,
    },
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        tipo: DeviceType,
        #[arg(long, default_value = "ACTIVO")]
        estado: DeviceStatus,
        #[arg(long)]
        ubicacion: String,
        #[arg(long, default_value = "")]
        notas: String,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        marca: Option<String>,
        #[arg(long)]
        modelo: Option<String>,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        estado: Option<DeviceStatus>,
        #[arg(long)]
        ubicacion: Option<String>,
        #[arg(long)]
        notas: Option<String>,
    },
    /// Print a device's history sheet.
    Cv { id: Uuid },
}

#[derive(Debug, Subcommand)]
enum BackupsCommand {
    List {
        #[arg(long)]
        device: Option<Uuid>,
    },
    Create {
        #[arg(long)]
        device: Uuid,
        #[arg(long)]
        tipo: BackupType,
        #[arg(long)]
        almacenamiento: StorageKind,
        #[arg(long)]
        frecuencia: String,
        #[arg(long)]
        evidencia_url: Option<String>,
        #[arg(long)]
        notas: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum PermissionsCommand {
    List,
    Grant {
        email: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Revoke { id: Uuid },
    Check,
}

#[derive(Debug, Subcommand)]
enum TicketsCommand {
    List {
        #[arg(long)]
        estado: Option<TicketStatus>,
    },
    Show { id: Uuid },
    Create {
        #[arg(long)]
        titulo: String,
        #[arg(long, default_value = "")]
        descripcion: String,
        #[arg(long, default_value = "MEDIA")]
        prioridad: TicketPriority,
        #[arg(long)]
        device: Option<Uuid>,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        estado: Option<TicketStatus>,
        #[arg(long)]
        prioridad: Option<TicketPriority>,
        #[arg(long)]
        asignado: Option<Uuid>,
    },
    Comment { id: Uuid, comentario: String },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::normalize(raw).ok_or_else(|| format!("rol inválido: {raw}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let tokens: Arc<dyn TokenStore> =
        Arc::new(FileTokenStore::from_env().context("Locating the session file")?);
    let api = ApiClient::from_env(Arc::clone(&tokens));
    let session = SessionManager::from_env(Arc::clone(&tokens));

    match cli.command {
        Command::Login { email, password } => login(&api, &session, &email, &password).await,
        Command::Logout => {
            if session.try_client().is_some() {
                session.sign_out().await?;
            } else {
                tokens.remove(ACCESS_TOKEN_KEY)?;
            }
            println!("Sesión cerrada.");
            Ok(())
        }
        Command::Whoami => {
            let profile = api.auth().profile().await?;
            let role = profile.role().map(Role::label).unwrap_or("Rol desconocido");
            println!("{} <{}> - {}", profile.nombre, profile.email, role);
            if let Some(unit) = profile.org_unit_nombre {
                println!("Unidad: {unit}");
            }
            Ok(())
        }
        Command::Users(cmd) => users(api, cmd).await,
        Command::Devices(cmd) => devices(api, cmd).await,
        Command::Backups(cmd) => backups(api, cmd).await,
        Command::Permissions(cmd) => permissions(api, cmd).await,
        Command::Tickets(cmd) => tickets(api, cmd).await,
        Command::Dashboard => {
            let metrics = api.dashboard().metrics().await?;
            let d = &metrics.dispositivos;
            let t = &metrics.tickets;
            println!(
                "Dispositivos: {} (activos {}, en reparación {})",
                d.total, d.activos, d.reparacion
            );
            println!(
                "Tickets: {} (abiertos {}, en proceso {})",
                t.total, t.abiertos, t.en_proceso
            );
            println!("Backups: {}", metrics.backups.total);
            Ok(())
        }
    }
}

/// Prefer the backend service's password grant; without it configured the
/// API's own login endpoint is used.
async fn login(
    api: &ApiClient,
    session: &SessionManager,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    if session.try_client().is_some() {
        session.sign_in_with_password(email, password).await?;
    } else {
        let tokens = api.auth().login(email, password).await?;
        api.tokens().set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
    }
    let profile = api.auth().profile().await?;
    println!("Sesión iniciada como {} ({})", profile.nombre, profile.rol);
    Ok(())
}

/// Print the banner and turn a failed action into an error exit.
fn finish(banner: &BannerSlot, outcome: Outcome) -> anyhow::Result<()> {
    if let Some(b) = banner.visible() {
        match b.kind {
            BannerKind::Success => println!("{}", b.text),
            BannerKind::Error => eprintln!("{}", b.text),
        }
    }
    if outcome == Outcome::Failed {
        bail!("La operación no se completó");
    }
    Ok(())
}

async fn users(api: ApiClient, cmd: UsersCommand) -> anyhow::Result<()> {
    let mut screen = UsersScreen::new(api);
    screen.mount().await;

    let outcome = match cmd {
        UsersCommand::List => {
            for user in &screen.users {
                println!(
                    "{}  {:<28} {:<32} {:<14} {:<8} {}",
                    user.id,
                    user.nombre,
                    user.email,
                    user.role().map(Role::as_str).unwrap_or(user.rol.as_str()),
                    if user.activo { "activo" } else { "inactivo" },
                    user.org_unit_nombre.as_deref().unwrap_or("-"),
                );
            }
            return finish(&screen.banner, Outcome::Skipped);
        }
        UsersCommand::Create {
            nombre,
            email,
            password,
            rol,
            org_unit,
            inactive,
        } => {
            screen.form.nombre = nombre;
            screen.form.email = email;
            screen.form.password = password;
            screen.form.rol = rol;
            screen.form.org_unit_id = org_unit;
            screen.form.activo = !inactive;
            screen.create_user().await
        }
        UsersCommand::SetRole { id, rol } => screen.change_role(id, rol).await,
        UsersCommand::SetOrgUnit { id, org_unit } => screen.change_org_unit(id, org_unit).await,
        UsersCommand::Toggle { id } => screen.toggle_active(id).await,
        UsersCommand::ResetPassword { id, password } => {
            screen.reset_password(id, &password).await
        }
    };
    if outcome == Outcome::Skipped {
        println!("Sin cambios.");
    }
    finish(&screen.banner, outcome)
}

async fn devices(api: ApiClient, cmd: DevicesCommand) -> anyhow::Result<()> {
    match cmd {
        DevicesCommand::List { search, estado } => {
            let mut screen = DevicesScreen::new(api);
            screen.load().await;
            screen.search = search;
            screen.estado_filter = estado;
            for device in screen.filtered() {
                println!(
                    "{}  {:<24} {:<10} {:<12} {}",
                    device.id, device.nombre, device.tipo, device.estado, device.ubicacion
                );
            }
            finish(&screen.banner, Outcome::Skipped)
        }
        DevicesCommand::Create {
            nombre,
            tipo,
            estado,
            ubicacion,
            notas,
            serial,
            marca,
            modelo,
        } => {
            let mut screen = DevicesScreen::new(api);
            let input = NewDevice {
                nombre,
                tipo,
                estado,
                ubicacion,
                notas: Some(notas).filter(|n| !n.trim().is_empty()),
                serial,
                marca,
                modelo,
                specs: None,
            };
            let outcome = screen.create_with(input).await;
            if let Some(id) = screen.selected {
                println!("{id}");
            }
            finish(&screen.banner, outcome)
        }
        DevicesCommand::Update {
            id,
            nombre,
            estado,
            ubicacion,
            notas,
        } => {
            let mut screen = DevicesScreen::new(api);
            screen.load().await;
            if !screen.select(id) {
                bail!("Dispositivo no encontrado");
            }
            if let Some(nombre) = nombre {
                screen.form.nombre = nombre;
            }
            if let Some(estado) = estado {
                screen.form.estado = estado;
            }
            if let Some(ubicacion) = ubicacion {
                screen.form.ubicacion = ubicacion;
            }
            if let Some(notas) = notas {
                screen.form.notas = notas;
            }
            let outcome = screen.update_selected().await;
            finish(&screen.banner, outcome)
        }
        DevicesCommand::Cv { id } => {
            let cv = api.devices().cv(id).await?;
            let d = &cv.device;
            println!("{} ({}) - {} - {}", d.nombre, d.tipo, d.estado, d.ubicacion);
            if let Some(specs) = &cv.specs {
                println!("Especificaciones: {specs}");
            }
            println!("Historial:");
            for log in &cv.logs {
                println!(
                    "  {}  {:<14} {}",
                    log.fecha.format("%Y-%m-%d %H:%M"),
                    log.tipo,
                    log.descripcion
                );
            }
            println!("Backups: {}", cv.backups.len());
            println!("Bloques de auditoría: {}", cv.audit.len());
            Ok(())
        }
    }
}

async fn backups(api: ApiClient, cmd: BackupsCommand) -> anyhow::Result<()> {
    let mut screen = BackupsScreen::new(api);
    let outcome = match cmd {
        BackupsCommand::List { device } => {
            screen.device_filter = device;
            screen.load().await;
            for backup in &screen.items {
                let device = backup
                    .device
                    .as_ref()
                    .and_then(|d| d.nombre.as_deref())
                    .unwrap_or("-");
                println!(
                    "{}  {:<20} {:<12} {:<8} {}",
                    backup.fecha_backup.format("%Y-%m-%d %H:%M"),
                    device,
                    backup.tipo.label(),
                    backup.almacenamiento.label(),
                    backup.frecuencia,
                );
            }
            Outcome::Skipped
        }
        BackupsCommand::Create {
            device,
            tipo,
            almacenamiento,
            frecuencia,
            evidencia_url,
            notas,
        } => {
            let input = NewBackup {
                device_id: device,
                tipo,
                almacenamiento,
                frecuencia,
                evidencia_url,
                notas,
            };
            screen.record(&input).await
        }
    };
    finish(&screen.banner, outcome)
}

async fn permissions(api: ApiClient, cmd: PermissionsCommand) -> anyhow::Result<()> {
    let mut screen = PermissionsScreen::new(api);
    let outcome = match cmd {
        PermissionsCommand::List => {
            screen.load().await;
            for grant in &screen.grants {
                println!(
                    "{}  {:<32} {}  {}",
                    grant.id,
                    grant.email,
                    grant.granted_at.format("%Y-%m-%d"),
                    grant.notes.as_deref().unwrap_or(""),
                );
            }
            Outcome::Skipped
        }
        PermissionsCommand::Grant { email, notes } => {
            screen.grant(&email, notes.as_deref()).await
        }
        PermissionsCommand::Revoke { id } => screen.revoke(id).await,
        PermissionsCommand::Check => {
            screen.refresh_check().await;
            if let Some(check) = &screen.check {
                let verdict = if check.can_manage { "sí" } else { "no" };
                println!("Puede gestionar inventario: {verdict} ({})", check.source);
            }
            Outcome::Skipped
        }
    };
    finish(&screen.banner, outcome)
}

async fn tickets(api: ApiClient, cmd: TicketsCommand) -> anyhow::Result<()> {
    match cmd {
        TicketsCommand::List { estado } => {
            for ticket in api.tickets().list(estado).await? {
                println!(
                    "{}  {:<10} {:<8} {}",
                    ticket.id, ticket.estado, ticket.prioridad, ticket.titulo
                );
            }
        }
        TicketsCommand::Show { id } => {
            let detail = api.tickets().get(id).await?;
            let t = &detail.ticket;
            println!("{} [{} / {}]", t.titulo, t.estado, t.prioridad);
            if !t.descripcion.is_empty() {
                println!("{}", t.descripcion);
            }
            for comment in &detail.comments {
                let author = comment
                    .usuario
                    .as_ref()
                    .map(|u| u.nombre.as_str())
                    .unwrap_or("-");
                println!(
                    "  {} {}: {}",
                    comment.fecha.format("%Y-%m-%d %H:%M"),
                    author,
                    comment.comentario
                );
            }
        }
        TicketsCommand::Create {
            titulo,
            descripcion,
            prioridad,
            device,
        } => {
            let ticket = api
                .tickets()
                .create(&NewTicket {
                    titulo,
                    descripcion,
                    prioridad,
                    device_id: device,
                })
                .await?;
            println!("{}", ticket.id);
        }
        TicketsCommand::Update {
            id,
            estado,
            prioridad,
            asignado,
        } => {
            let changes = TicketChanges {
                estado,
                prioridad,
                asignado_a: asignado,
            };
            let ticket = api.tickets().update(id, &changes).await?;
            println!("Ticket actualizado: {}", ticket.estado);
        }
        TicketsCommand::Comment { id, comentario } => {
            api.tickets().add_comment(id, &comentario).await?;
            println!("Comentario agregado");
        }
    }
    Ok(())
}
