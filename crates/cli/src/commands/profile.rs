//! Profile management commands
//!
//! Profiles name an S3 endpoint and optional static credentials. Without a
//! profile, commands use the AWS environment (AWS_* variables, shared config).

use clap::Subcommand;
use serde::Serialize;

use s3kit_core::{Error, Profile, ProfileManager};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List configured profiles
    List,

    /// Show one profile (secrets are never printed)
    Show {
        /// Name of the profile to show
        name: String,
    },

    /// Remove a profile
    Remove {
        /// Name of the profile to remove
        name: String,
    },

    /// Use a profile when --profile is not given
    Default {
        /// Name of the profile
        name: String,
    },
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name
    pub name: String,

    /// Custom endpoint URL (e.g. "http://localhost:9000")
    #[arg(long)]
    pub endpoint: Option<String>,

    /// AWS region
    #[arg(long)]
    pub region: Option<String>,

    /// Access key ID
    #[arg(long, requires = "secret_key")]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, requires = "access_key")]
    pub secret_key: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long)]
    pub path_style: bool,
}

/// Profile information for output (without secrets)
#[derive(Debug, Serialize)]
struct ProfileInfo {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    static_credentials: bool,
    path_style: bool,
    default: bool,
}

impl ProfileInfo {
    fn new(profile: &Profile, default: Option<&str>) -> Self {
        Self {
            name: profile.name.clone(),
            endpoint: profile.endpoint.clone(),
            region: profile.region.clone(),
            static_credentials: profile.static_credentials().is_some(),
            path_style: profile.path_style,
            default: default == Some(profile.name.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

#[derive(Debug, Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => return super::fail(&formatter, "Failed to load configuration", &e),
    };

    match cmd {
        ProfileCommands::Set(args) => {
            let name = args.name.clone();
            let result = manager.set(profile_from_args(args));
            finish(&formatter, result, &name, "configured")
        }
        ProfileCommands::List => list(&manager, &formatter),
        ProfileCommands::Show { name } => show(&manager, &formatter, &name),
        ProfileCommands::Remove { name } => {
            let result = manager.remove(&name);
            finish(&formatter, result, &name, "removed")
        }
        ProfileCommands::Default { name } => {
            let result = manager.set_default(&name);
            finish(&formatter, result, &name, "set as default")
        }
    }
}

fn profile_from_args(args: SetArgs) -> Profile {
    let mut profile = Profile::new(args.name);
    profile.endpoint = args.endpoint;
    profile.region = args.region;
    profile.access_key = args.access_key;
    profile.secret_key = args.secret_key;
    profile.path_style = args.path_style;
    profile
}

fn list(manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let (profiles, default) = match manager
        .list()
        .and_then(|profiles| manager.default_name().map(|default| (profiles, default)))
    {
        Ok(loaded) => loaded,
        Err(e) => return super::fail(formatter, "Failed to list profiles", &e),
    };
    let infos: Vec<ProfileInfo> = profiles
        .iter()
        .map(|p| ProfileInfo::new(p, default.as_deref()))
        .collect();

    if formatter.is_json() {
        formatter.json(&ProfileListOutput { profiles: infos });
    } else if infos.is_empty() {
        formatter.println("No profiles configured. Using the AWS environment.");
    } else {
        for info in &infos {
            let marker = if info.default { "*" } else { " " };
            formatter.println(&format!(
                "{marker} {:<12} {} (region: {})",
                info.name,
                info.endpoint.as_deref().unwrap_or("aws"),
                info.region.as_deref().unwrap_or("default"),
            ));
        }
    }
    ExitCode::Success
}

fn show(manager: &ProfileManager, formatter: &Formatter, name: &str) -> ExitCode {
    let (profile, default) = match manager
        .get(name)
        .and_then(|profile| manager.default_name().map(|default| (profile, default)))
    {
        Ok(loaded) => loaded,
        Err(Error::ProfileNotFound(_)) => {
            formatter.error(&format!("Profile '{name}' not found"));
            return ExitCode::NotFound;
        }
        Err(e) => return super::fail(formatter, "Failed to load profile", &e),
    };
    let info = ProfileInfo::new(&profile, default.as_deref());

    if formatter.is_json() {
        formatter.json(&info);
    } else {
        formatter.println(&format!("Name:        {}", info.name));
        formatter.println(&format!(
            "Endpoint:    {}",
            info.endpoint.as_deref().unwrap_or("aws")
        ));
        formatter.println(&format!(
            "Region:      {}",
            info.region.as_deref().unwrap_or("default")
        ));
        let credentials = if info.static_credentials {
            "static"
        } else {
            "environment"
        };
        formatter.println(&format!("Credentials: {credentials}"));
        formatter.println(&format!("Path style:  {}", info.path_style));
        formatter.println(&format!("Default:     {}", info.default));
    }
    ExitCode::Success
}

fn finish(formatter: &Formatter, result: s3kit_core::Result<()>, name: &str, verb: &str) -> ExitCode {
    match result {
        Ok(()) => {
            let message = format!("Profile '{name}' {verb}");
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: name.to_string(),
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(Error::ProfileNotFound(_)) => {
            formatter.error(&format!("Profile '{name}' not found"));
            ExitCode::NotFound
        }
        Err(e) => super::fail(formatter, "Profile update failed", &e),
    }
}
