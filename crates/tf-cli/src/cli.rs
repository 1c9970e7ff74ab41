// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Command-line argument definitions

use clap::{Args, Parser, Subcommand};

use tf_api_contract::{TaskPriority, TaskStatus};

#[derive(Debug, Parser)]
#[command(name = "taskflow", about = "TaskFlow task manager client", version)]
pub struct Cli {
    /// Base URL of the TaskFlow API gateway
    #[arg(
        long,
        env = "TASKFLOW_API_URL",
        default_value = "http://localhost:8099",
        global = true
    )]
    pub api_url: String,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account
    Register(RegisterArgs),
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Sign out and clear the persisted session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tasks, optionally narrowed by quick filters
    List(ListArgs),
    /// Run a server-side search
    Search(SearchArgs),
    /// Force server-side resynchronization, then re-fetch
    Sync,
    /// Show per-status task counts
    Stats,
    /// Create a task
    Create(CreateArgs),
    /// Update a task's fields
    Edit(EditArgs),
    /// Change only the status of a task
    Status(StatusArgs),
    /// Change only the priority of a task
    Priority(PriorityArgs),
    /// Delete a task
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show tasks with this status
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Only show tasks with this priority
    #[arg(long)]
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub mode: SearchCommand,
}

#[derive(Debug, Subcommand)]
pub enum SearchCommand {
    /// All tasks for the signed-in user
    All,
    /// Tasks matching one status
    Status { status: TaskStatus },
    /// Tasks matching one priority
    Priority { priority: TaskPriority },
    /// Tasks whose title or description contains a keyword
    Keyword { keyword: String },
    /// Combined keyword/status/priority filter with pagination
    Advanced(AdvancedArgs),
}

#[derive(Debug, Args)]
pub struct AdvancedArgs {
    #[arg(long)]
    pub keyword: Option<String>,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// Earliest deadline, as YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub deadline_from: Option<String>,
    /// Latest deadline, as YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub deadline_to: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    #[arg(long, default_value_t = 50)]
    pub size: u32,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "TODO")]
    pub status: TaskStatus,
    #[arg(long, default_value = "MEDIUM")]
    pub priority: TaskPriority,
    /// Deadline as YYYY-MM-DDTHH:MM; omit for none
    #[arg(long, default_value = "")]
    pub deadline: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// New deadline as YYYY-MM-DDTHH:MM; pass an empty string to clear
    #[arg(long)]
    pub deadline: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    pub id: i64,
    pub status: TaskStatus,
}

#[derive(Debug, Args)]
pub struct PriorityArgs {
    pub id: i64,
    pub priority: TaskPriority,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
