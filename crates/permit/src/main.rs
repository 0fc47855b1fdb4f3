#![forbid(unsafe_code)]

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use permit_core::roles::load_role_table;
use permit_core::{Procedure, RoleClass, RoleTable, User};
use permit_engine::{
    is_procedure_in_elaborate_state, EnhancedPermissionChecker, Evaluation,
    ResolutionPermissionChecker, StateAssessment,
};

#[derive(Parser)]
#[command(
    name = "permit",
    version,
    about = "Decide who may elaborate a procedure resolution. Fail-closed."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Check whether a user may elaborate a resolution for a procedure.
    Check {
        /// Path to procedure .json (or "-" for stdin).
        procedure: String,

        /// Path to user .json.
        #[arg(long, conflicts_with = "role_id")]
        user: Option<String>,

        /// Role id of the acting user.
        #[arg(long, allow_hyphen_values = true)]
        role_id: Option<i64>,

        /// Role label, for diagnostics only.
        #[arg(long, requires = "role_id")]
        role_name: Option<String>,

        /// Include reason and assignment fields.
        #[arg(long)]
        enhanced: bool,

        /// Output JSON.
        #[arg(long)]
        json: bool,

        /// Role table .json overriding the legacy mapping.
        #[arg(long)]
        roles: Option<String>,
    },

    /// Classify a procedure's workflow state.
    State {
        /// Path to procedure .json (or "-" for stdin).
        procedure: String,

        /// Output JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show how a role id is classified.
    Role {
        /// Role id to classify.
        #[arg(allow_hyphen_values = true)]
        role_id: i64,

        /// Output JSON.
        #[arg(long)]
        json: bool,

        /// Role table .json overriding the legacy mapping.
        #[arg(long)]
        roles: Option<String>,
    },

    /// Print the effective role table as JSON.
    Roles {
        /// Role table .json overriding the legacy mapping.
        #[arg(long)]
        roles: Option<String>,
    },

    /// Evaluate one user against an array of procedures.
    Batch {
        /// Path to a .json array of procedures (or "-" for stdin).
        procedures: String,

        /// Role id of the acting user.
        #[arg(long, allow_hyphen_values = true)]
        role_id: i64,

        /// Output JSON.
        #[arg(long)]
        json: bool,

        /// Role table .json overriding the legacy mapping.
        #[arg(long)]
        roles: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Check {
            procedure,
            user,
            role_id,
            role_name,
            enhanced,
            json,
            roles,
        } => {
            let user = match (user, role_id) {
                (Some(path), _) => Some(read_json::<User>(&path)?),
                (None, Some(id)) => Some(User {
                    role_id: Some(id),
                    role_name,
                }),
                (None, None) => None,
            };
            cmd_check(&procedure, user.as_ref(), enhanced, json, roles.as_deref())
        }

        Cmd::State { procedure, json } => cmd_state(&procedure, json),

        Cmd::Role {
            role_id,
            json,
            roles,
        } => cmd_role(role_id, json, roles.as_deref()),

        Cmd::Roles { roles } => cmd_roles(roles.as_deref()),

        Cmd::Batch {
            procedures,
            role_id,
            json,
            roles,
        } => cmd_batch(&procedures, role_id, json, roles.as_deref()),
    }
}

/// Logs go to stderr; stdout carries results only. `PERMIT_LOG` sets the
/// filter, `PERMIT_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PERMIT_LOG")
        .unwrap_or_else(|_| "warn".into());
    let json = std::env::var("PERMIT_LOG_FORMAT").is_ok_and(|f| f == "json");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn read_json<T: DeserializeOwned>(file: &str) -> Result<T> {
    let content = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("cannot read {file}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("{file}: invalid JSON"))
}

fn role_table(path: Option<&str>) -> Result<RoleTable> {
    match path {
        Some(p) => {
            let table = load_role_table(p)?;
            tracing::debug!(path = p, "loaded role table");
            Ok(table)
        }
        None => Ok(RoleTable::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn cmd_check(
    file: &str,
    user: Option<&User>,
    enhanced: bool,
    json_out: bool,
    roles: Option<&str>,
) -> Result<()> {
    let procedure: Procedure = read_json(file)?;
    let checker = ResolutionPermissionChecker::new(role_table(roles)?);

    let (can_elaborate, reason) = if enhanced {
        let result = EnhancedPermissionChecker::new(checker).check(&procedure, user);
        if json_out {
            let mut report = serde_json::to_value(&result)?;
            if let Some(obj) = report.as_object_mut() {
                obj.insert("procedure".into(), procedure.label().into());
                obj.insert("evaluated_at".into(), now().into());
            }
            print_json(&report)?;
        } else {
            print_verdict(&procedure, result.can_elaborate, result.is_director, &result.reason);
        }
        (result.can_elaborate, result.reason)
    } else {
        let evaluation = checker.evaluate(&procedure, user);
        let permission = evaluation.permission();
        if json_out {
            print_json(&serde_json::json!({
                "procedure": procedure.label(),
                "can_elaborate": permission.can_elaborate,
                "is_director": permission.is_director,
                "evaluated_at": now(),
            }))?;
        } else {
            print_verdict(
                &procedure,
                permission.can_elaborate,
                permission.is_director,
                &evaluation.reason(),
            );
        }
        (permission.can_elaborate, evaluation.reason())
    };

    if !can_elaborate {
        bail!("resolution not permitted for {}: {reason}", procedure.label());
    }
    Ok(())
}

fn print_verdict(procedure: &Procedure, allowed: bool, is_director: bool, reason: &str) {
    let verdict = if allowed { "allow" } else { "deny " };
    let authority = if is_director { " [director]" } else { "" };
    println!("  {verdict} {}{authority}: {reason}", procedure.label());
}

#[derive(Serialize)]
struct StateReport {
    procedure: String,
    #[serde(flatten)]
    assessment: StateAssessment,
    evaluated_at: String,
}

fn cmd_state(file: &str, json_out: bool) -> Result<()> {
    let procedure: Procedure = read_json(file)?;
    let assessment = is_procedure_in_elaborate_state(&procedure);
    if json_out {
        print_json(&StateReport {
            procedure: procedure.label(),
            assessment,
            evaluated_at: now(),
        })?;
    } else {
        let verdict = if assessment.can_elaborate { "open" } else { "closed" };
        println!(
            "  {verdict:<6} {} ({}): {}",
            procedure.label(),
            assessment.state,
            assessment.state_reason
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct RoleReport {
    role_id: i64,
    label: String,
    class: RoleClass,
    is_technical_reviewer: bool,
    is_director: bool,
    is_legacy_director: bool,
    can_access_procedure_approvals: bool,
    below_citizen_floor: bool,
    evaluated_at: String,
}

fn cmd_role(role_id: i64, json_out: bool, roles: Option<&str>) -> Result<()> {
    let table = role_table(roles)?;
    let class = table.classify(role_id);
    let report = RoleReport {
        role_id,
        label: table.label(role_id),
        class,
        is_technical_reviewer: class.is_technical_reviewer(),
        is_director: class.is_director(),
        is_legacy_director: class.is_legacy_director(),
        can_access_procedure_approvals: class.can_access_procedure_approvals(),
        below_citizen_floor: role_id <= table.citizen_floor,
        evaluated_at: now(),
    };

    if json_out {
        return print_json(&report);
    }
    println!("  Role:      {} ({})", report.role_id, report.label);
    println!("  Class:     {}", report.class);
    println!("  Reviewer:  {}", report.is_technical_reviewer);
    println!("  Director:  {}", report.is_director);
    println!("  Approvals: {}", report.can_access_procedure_approvals);
    if report.is_legacy_director && report.below_citizen_floor {
        eprintln!("  note: role {role_id} is a legacy director id but sits at the citizen floor");
    }
    Ok(())
}

fn cmd_roles(roles: Option<&str>) -> Result<()> {
    print_json(&role_table(roles)?)
}

#[derive(Serialize)]
struct BatchRow {
    procedure: String,
    can_elaborate: bool,
    is_director: bool,
    reason: String,
}

#[derive(Serialize)]
struct BatchReport<'a> {
    role_id: i64,
    evaluated_at: String,
    results: &'a [BatchRow],
}

fn cmd_batch(file: &str, role_id: i64, json_out: bool, roles: Option<&str>) -> Result<()> {
    let procedures: Vec<Procedure> = read_json(file)?;
    let checker = ResolutionPermissionChecker::new(role_table(roles)?);
    let user = User::with_role(role_id);

    let rows: Vec<BatchRow> = procedures
        .iter()
        .map(|p| {
            let evaluation: Evaluation = checker.evaluate(p, Some(&user));
            let permission = evaluation.permission();
            BatchRow {
                procedure: p.label(),
                can_elaborate: permission.can_elaborate,
                is_director: permission.is_director,
                reason: evaluation.reason(),
            }
        })
        .collect();

    if json_out {
        return print_json(&BatchReport {
            role_id,
            evaluated_at: now(),
            results: &rows,
        });
    }

    println!("{:<20}  {:<6}  {:<8}  REASON", "PROCEDURE", "ALLOW", "DIRECTOR");
    println!(
        "{:<20}  {:<6}  {:<8}  {}",
        "-".repeat(20),
        "-".repeat(6),
        "-".repeat(8),
        "-".repeat(6)
    );
    for row in &rows {
        println!(
            "{:<20}  {:<6}  {:<8}  {}",
            row.procedure, row.can_elaborate, row.is_director, row.reason
        );
    }
    let allowed = rows.iter().filter(|r| r.can_elaborate).count();
    eprintln!("\n{allowed} of {} procedure(s) open to role {role_id}", rows.len());
    Ok(())
}
