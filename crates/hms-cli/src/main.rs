//! `hms`: terminal front desk for the hospital backend

mod logging;
mod render;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use hms_app::auth::{self, LOGIN_FAILED, REGISTRATION_FAILED};
use hms_app::{
    menu, AppConfig, AppContext, AppError, AppResult, AppointmentBoard, BookingWizard, Dashboard,
    DoctorDirectory, DoctorProfileEditor, LoginForm, MutationOutcome, Notice, PatientProfileView,
    PatientRoster, RegistrationForm, Resolution, Route,
};
use hms_core::{
    AppointmentFilter, AppointmentId, AppointmentStatus, DateFilter, DoctorCredentials,
    DoctorRegistration, PatientCredentials, PatientRegistration, Role, Severity, StatusFilter,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

fn cli() -> Command {
    Command::new("hms")
        .version(hms_app::VERSION)
        .about("Hospital front desk: sessions, appointments and bookings")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("Backend base URL (overrides config and HMS_API_URL)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the stored session"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in as a doctor (email) or a patient (contact)")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .conflicts_with("contact")
                        .required_unless_present("contact")
                        .help("Doctor email"),
                )
                .arg(Arg::new("contact").long("contact").help("Patient phone or contact"))
                .arg(Arg::new("password").long("password").required(true).help("Account password")),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and sign in")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .default_value("patient")
                        .value_parser(["doctor", "patient"])
                        .help("Account type"),
                )
                .arg(Arg::new("name").long("name").required(true).help("Full name"))
                .arg(Arg::new("password").long("password").required(true).help("Account password"))
                .arg(Arg::new("email").long("email").help("Doctor email"))
                .arg(Arg::new("contact").long("contact").help("Patient phone or contact"))
                .arg(Arg::new("secret-key").long("secret-key").help("Admin secret for doctor accounts"))
                .arg(Arg::new("qualification").long("qualification").help("Doctor qualification")),
        )
        .subcommand(Command::new("logout").about("Sign out and clear the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("open")
                .about("Navigate to a page path and show where it lands")
                .arg(Arg::new("path").required(true).help("Page path, e.g. /appointments")),
        )
        .subcommand(Command::new("dashboard").about("Show the role's dashboard"))
        .subcommand(
            Command::new("appointments")
                .about("List appointments")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .default_value("all")
                        .help("all, pending, confirmed, completed or cancelled"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .default_value("all")
                        .help("all, today, this-week or this-month"),
                )
                .arg(Arg::new("search").long("search").help("Match patient, problem or code")),
        )
        .subcommand(
            Command::new("confirm")
                .about("Confirm a pending appointment")
                .arg(Arg::new("id").required(true).help("Appointment id")),
        )
        .subcommand(
            Command::new("reject")
                .about("Reject a pending appointment")
                .arg(Arg::new("id").required(true).help("Appointment id"))
                .arg(Arg::new("reason").long("reason").required(true).help("Reason shown to the patient")),
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel one of your pending appointments")
                .arg(Arg::new("id").required(true).help("Appointment id")),
        )
        .subcommand(
            Command::new("status")
                .about("Move an appointment to a new status")
                .arg(Arg::new("id").required(true).help("Appointment id"))
                .arg(Arg::new("status").required(true).help("Target status"))
                .arg(Arg::new("result").long("result").help("Visit result notes")),
        )
        .subcommand(
            Command::new("lookup")
                .about("Find an appointment by its code")
                .arg(Arg::new("code").required(true).help("Appointment code, e.g. APT-1A2B3C4D")),
        )
        .subcommand(
            Command::new("doctors")
                .about("Browse the doctor directory")
                .arg(Arg::new("search").long("search").help("Match name or specialization"))
                .arg(Arg::new("specialty").long("specialty").help("Exact specialization, or all")),
        )
        .subcommand(
            Command::new("patients")
                .about("List your patients")
                .arg(Arg::new("search").long("search").help("Match name or contact")),
        )
        .subcommand(
            Command::new("book")
                .about("Book an appointment with a doctor")
                .arg(Arg::new("doctor").long("doctor").required(true).help("Doctor id"))
                .arg(Arg::new("problem").long("problem").required(true).help("What brings you in"))
                .arg(
                    Arg::new("severity")
                        .long("severity")
                        .default_value("moderate")
                        .value_parser(["mild", "moderate", "severe"])
                        .help("How bad it is"),
                )
                .arg(Arg::new("duration").long("duration").help("How long it has lasted"))
                .arg(Arg::new("history").long("history").help("Relevant medical history"))
                .arg(Arg::new("date").long("date").help("Preferred date, YYYY-MM-DD"))
                .arg(Arg::new("time").long("time").help("Preferred slot, e.g. \"10:30 AM\""))
                .arg(
                    Arg::new("forward-schedule")
                        .long("forward-schedule")
                        .action(ArgAction::SetTrue)
                        .help("Send the preferred date and time to the backend"),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Show or edit your profile")
                .arg(
                    Arg::new("set")
                        .long("set")
                        .action(ArgAction::Append)
                        .value_name("FIELD=VALUE")
                        .help("Change a field; may be repeated"),
                ),
        )
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    logging::init(matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<AppConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = AppConfig::load(path.map(PathBuf::as_path)).context("loading configuration")?;
    if let Some(url) = matches.get_one::<String>("api-url") {
        config = config.with_base_url(url.clone());
    }
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir.clone());
    }
    Ok(config)
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut config = load_config(matches)?;
    if let Some(("book", args)) = matches.subcommand() {
        if args.get_flag("forward-schedule") {
            config = config.with_forward_schedule(true);
        }
    }
    debug!(base_url = %config.client.base_url, data_dir = %config.data_dir.display(), "configuration loaded");

    let ctx = Arc::new(AppContext::open(config).context("opening the backend client")?);
    let state = ctx.restore();
    debug!(?state, location = %ctx.location(), "session restored");

    match matches.subcommand() {
        Some(("login", args)) => login(&ctx, args).await,
        Some(("register", args)) => register(&ctx, args).await,
        Some(("logout", _)) => {
            ctx.logout().await.context("clearing the stored session")?;
            println!("Signed out");
            Ok(())
        }
        Some(("whoami", _)) => {
            whoami(&ctx);
            Ok(())
        }
        Some(("open", args)) => {
            let path = required(args, "path")?;
            show_resolution(&ctx, ctx.navigate_path(path));
            Ok(())
        }
        Some(("dashboard", _)) => dashboard(&ctx).await,
        Some(("appointments", args)) => appointments(&ctx, args).await,
        Some(("confirm", args)) => {
            open_page(&ctx, Route::Appointments)?;
            let board = loaded_board(&ctx).await?;
            let id = appointment_id(args)?;
            report(board.confirm(&id).await, "Appointment confirmed", "Failed to confirm appointment")
        }
        Some(("reject", args)) => {
            open_page(&ctx, Route::Appointments)?;
            let board = loaded_board(&ctx).await?;
            let id = appointment_id(args)?;
            let reason = required(args, "reason")?;
            report(board.reject(&id, reason).await, "Appointment rejected", "Failed to reject appointment")
        }
        Some(("cancel", args)) => {
            open_page(&ctx, Route::MyAppointments)?;
            let board = loaded_board(&ctx).await?;
            let id = appointment_id(args)?;
            report(board.cancel(&id).await, "Appointment cancelled", "Failed to cancel appointment")
        }
        Some(("status", args)) => {
            open_page(&ctx, Route::Appointments)?;
            let board = loaded_board(&ctx).await?;
            let id = appointment_id(args)?;
            let status = AppointmentStatus::parse(required(args, "status")?);
            let result = args.get_one::<String>("result").cloned();
            report(
                board.set_status(&id, status, result).await,
                "Appointment updated",
                "Failed to update appointment",
            )
        }
        Some(("lookup", args)) => {
            let board = AppointmentBoard::new(ctx.clone());
            let row = board
                .lookup_code(required(args, "code")?)
                .await
                .map_err(|e| failure(&e, "Appointment not found"))?;
            render::appointment(&row);
            Ok(())
        }
        Some(("doctors", args)) => doctors(&ctx, args).await,
        Some(("patients", args)) => patients(&ctx, args).await,
        Some(("book", args)) => book(&ctx, args).await,
        Some(("profile", args)) => profile(&ctx, args).await,
        Some((other, _)) => bail!("unknown command `{other}`"),
        None => bail!("no command given; see `hms --help`"),
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn optional(args: &ArgMatches, name: &str) -> String {
    args.get_one::<String>(name).cloned().unwrap_or_default()
}

fn appointment_id(args: &ArgMatches) -> anyhow::Result<AppointmentId> {
    required(args, "id").map(AppointmentId::from)
}

/// Turn a view-model failure into the text the page would show
fn failure(err: &AppError, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(Notice::from_error(err, fallback).to_string())
}

/// Print a mutation's notices; a rejected mutation fails, a failed reload only warns
fn report(result: AppResult<MutationOutcome>, success: &str, fallback: &str) -> anyhow::Result<()> {
    let rejected = result.is_err();
    for notice in Notice::for_mutation(&result, success, fallback) {
        match notice {
            Notice::Success(text) => println!("{text}"),
            failure if rejected => bail!(failure.to_string()),
            stale => eprintln!("warning: {stale}"),
        }
    }
    Ok(())
}

/// Navigate to `route`; anything but a render is an error
fn open_page(ctx: &AppContext, route: Route) -> anyhow::Result<()> {
    match ctx.navigate(route) {
        Resolution::Render(_) => Ok(()),
        Resolution::Redirect(Route::Login) => bail!("not signed in; run `hms login` first"),
        Resolution::Redirect(home) => {
            bail!("{} is not available to this account; home is {home}", route.path())
        }
    }
}

/// Pick the page for the signed-in role
fn role_page(ctx: &AppContext, doctor: Route, patient: Route) -> anyhow::Result<Route> {
    let route = match ctx.state().role() {
        Some(Role::Doctor) => doctor,
        Some(Role::Patient) => patient,
        None => bail!("not signed in; run `hms login` first"),
    };
    open_page(ctx, route)?;
    Ok(route)
}

async fn loaded_board(ctx: &Arc<AppContext>) -> anyhow::Result<AppointmentBoard> {
    let board = AppointmentBoard::new(ctx.clone());
    board
        .load()
        .await
        .map_err(|e| failure(&e, "Failed to load appointments"))?;
    Ok(board)
}

fn show_resolution(ctx: &AppContext, resolution: Resolution) {
    match resolution {
        Resolution::Render(route) => println!("{} ({})", route.title(), route.path()),
        Resolution::Redirect(route) => {
            println!("Redirected to {} ({})", route.title(), route.path());
        }
    }
    if let Some(role) = ctx.state().role() {
        println!();
        render::menu(&menu(role));
    }
}

async fn login(ctx: &AppContext, args: &ArgMatches) -> anyhow::Result<()> {
    let password = optional(args, "password");
    let form = match args.get_one::<String>("email") {
        Some(email) => LoginForm::Doctor(DoctorCredentials {
            email: email.clone(),
            password,
        }),
        None => LoginForm::Patient(PatientCredentials {
            contact: optional(args, "contact"),
            password,
        }),
    };
    let resolution = auth::login(ctx, &form)
        .await
        .map_err(|e| anyhow::anyhow!(auth::failure_message(&e, LOGIN_FAILED)))?;
    whoami(ctx);
    show_resolution(ctx, resolution);
    Ok(())
}

async fn register(ctx: &AppContext, args: &ArgMatches) -> anyhow::Result<()> {
    let role: Role = required(args, "role")?.parse()?;
    let form = match role {
        Role::Doctor => RegistrationForm::Doctor(DoctorRegistration {
            secret_key: optional(args, "secret-key"),
            name: optional(args, "name"),
            email: optional(args, "email"),
            password: optional(args, "password"),
            qualification: args.get_one::<String>("qualification").cloned(),
        }),
        Role::Patient => RegistrationForm::Patient(PatientRegistration {
            name: optional(args, "name"),
            contact: optional(args, "contact"),
            password: optional(args, "password"),
        }),
    };
    let resolution = auth::register(ctx, &form)
        .await
        .map_err(|e| anyhow::anyhow!(auth::failure_message(&e, REGISTRATION_FAILED)))?;
    whoami(ctx);
    show_resolution(ctx, resolution);
    Ok(())
}

fn whoami(ctx: &AppContext) {
    match ctx.session().user() {
        Some(user) => println!("Signed in as {} ({}, {})", user.name, user.role, user.handle()),
        None => println!("Not signed in"),
    }
}

async fn dashboard(ctx: &AppContext) -> anyhow::Result<()> {
    role_page(ctx, Route::DoctorDashboard, Route::PatientDashboard)?;
    let dashboard = Dashboard::load(ctx, &ctx.now())
        .await
        .map_err(|e| failure(&e, "Failed to load dashboard"))?;
    render::dashboard(&dashboard);
    Ok(())
}

async fn appointments(ctx: &Arc<AppContext>, args: &ArgMatches) -> anyhow::Result<()> {
    role_page(ctx, Route::Appointments, Route::MyAppointments)?;
    let status: StatusFilter = required(args, "status")?.parse()?;
    let date: DateFilter = required(args, "date")?.parse()?;
    let board = loaded_board(ctx).await?;
    board.set_filter(
        AppointmentFilter::new()
            .with_status(status)
            .with_date(date)
            .with_search(optional(args, "search")),
    );
    render::appointments(&board.filtered(&ctx.now()));
    Ok(())
}

async fn doctors(ctx: &AppContext, args: &ArgMatches) -> anyhow::Result<()> {
    role_page(ctx, Route::Doctors, Route::BookAppointment)?;
    let mut directory = DoctorDirectory::new();
    directory
        .load(ctx)
        .await
        .map_err(|e| failure(&e, "Failed to load doctors"))?;
    directory.set_search(optional(args, "search"));
    directory.set_specialty(args.get_one::<String>("specialty").map(String::as_str));
    render::doctors(&directory.visible());
    println!();
    println!("Specialties: {}", directory.specialties().join(", "));
    Ok(())
}

async fn patients(ctx: &AppContext, args: &ArgMatches) -> anyhow::Result<()> {
    open_page(ctx, Route::Patients)?;
    let mut roster = PatientRoster::new();
    roster
        .load(ctx)
        .await
        .map_err(|e| failure(&e, "Failed to load patients"))?;
    roster.set_search(optional(args, "search"));
    render::roster(&roster.visible());
    Ok(())
}

async fn book(ctx: &Arc<AppContext>, args: &ArgMatches) -> anyhow::Result<()> {
    open_page(ctx, Route::BookAppointment)?;
    let mut wizard = BookingWizard::new(ctx.clone());
    wizard
        .load_doctors()
        .await
        .map_err(|e| failure(&e, "Failed to load doctors"))?;
    wizard.select_doctor(required(args, "doctor")?)?;

    let preferred_date = args
        .get_one::<String>("date")
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid --date `{raw}`, expected YYYY-MM-DD"))
        })
        .transpose()?;
    {
        let details = wizard.details_mut()?;
        details.problem = optional(args, "problem");
        details.severity = required(args, "severity")?.parse::<Severity>()?;
        details.duration = optional(args, "duration");
        details.medical_history = optional(args, "history");
        details.preferred_date = preferred_date;
        details.preferred_time = args.get_one::<String>("time").cloned();
    }

    let today = ctx.now().date_naive();
    wizard
        .submit(today)
        .await
        .map_err(|e| failure(&e, "Failed to book appointment"))?;
    if let Some((doctor, code)) = wizard.confirmation() {
        println!("Appointment booked with {}", doctor.name);
        println!("Code: {code}");
    }
    Ok(())
}

async fn profile(ctx: &AppContext, args: &ArgMatches) -> anyhow::Result<()> {
    let edits: Vec<(&str, &str)> = args
        .get_many::<String>("set")
        .into_iter()
        .flatten()
        .map(|pair| {
            pair.split_once('=')
                .with_context(|| format!("expected FIELD=VALUE, got `{pair}`"))
        })
        .collect::<anyhow::Result<_>>()?;

    match role_page(ctx, Route::DoctorProfile, Route::PatientProfile)? {
        Route::DoctorProfile => {
            let mut editor = DoctorProfileEditor::new();
            editor
                .load(ctx)
                .await
                .map_err(|e| failure(&e, "Failed to load profile"))?;
            if edits.is_empty() {
                if let Some(saved) = editor.saved() {
                    render::doctor_profile(saved);
                }
                return Ok(());
            }
            editor.begin_edit()?;
            for (field, value) in edits {
                editor.set_field(field.trim(), value.trim())?;
            }
            let saved = editor
                .save(ctx)
                .await
                .map_err(|e| failure(&e, "Failed to update profile"))?;
            println!("Profile updated");
            render::doctor_profile(saved);
        }
        _ => {
            let mut view = PatientProfileView::new();
            let record = view
                .load(ctx)
                .await
                .map_err(|e| failure(&e, "Failed to load profile"))?;
            render::patient_profile(record);
            if !edits.is_empty() {
                bail!("patient profiles cannot be changed from the client");
            }
        }
    }
    Ok(())
}
