// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Command handlers wiring the CLI to the controller

use anyhow::{anyhow, bail, Result};
use std::io::Write;

use tf_api_contract::{parse_deadline_input, Task};
use tf_core::{AdvancedQuery, ControllerError, SearchMode, TaskController, TaskInput, TaskStats};

use crate::cli::{
    AdvancedArgs, Commands, CreateArgs, DeleteArgs, EditArgs, ListArgs, LoginArgs, PriorityArgs,
    RegisterArgs, SearchArgs, SearchCommand, StatusArgs,
};

/// Dispatch a parsed command against the controller.
pub async fn run(controller: &TaskController, command: Commands) -> Result<()> {
    match command {
        Commands::Register(args) => register(controller, args).await,
        Commands::Login(args) => login(controller, args).await,
        Commands::Logout => logout(controller).await,
        Commands::Whoami => whoami(controller).await,
        Commands::List(args) => list(controller, args).await,
        Commands::Search(args) => search(controller, args).await,
        Commands::Sync => sync(controller).await,
        Commands::Stats => stats(controller).await,
        Commands::Create(args) => create(controller, args).await,
        Commands::Edit(args) => edit(controller, args).await,
        Commands::Status(args) => status(controller, args).await,
        Commands::Priority(args) => priority(controller, args).await,
        Commands::Delete(args) => delete(controller, args).await,
    }
}

async fn register(controller: &TaskController, args: RegisterArgs) -> Result<()> {
    match controller.register(&args.username, &args.email, &args.password).await {
        Ok(user) => {
            println!("Registration successful for {}. Please sign in.", user.username);
            Ok(())
        }
        Err(error) => Err(surface(controller, error).await),
    }
}

async fn login(controller: &TaskController, args: LoginArgs) -> Result<()> {
    match controller.login(&args.email, &args.password).await {
        Ok(user) => {
            println!("Signed in as {} <{}>.", user.username, user.email);
            let tasks = controller.tasks().await;
            println!("{} task(s) loaded.", tasks.len());
            Ok(())
        }
        Err(error) => Err(surface(controller, error).await),
    }
}

async fn logout(controller: &TaskController) -> Result<()> {
    controller.logout().await?;
    println!("Signed out.");
    Ok(())
}

async fn whoami(controller: &TaskController) -> Result<()> {
    match controller.current_user().await {
        Some(user) => println!("{} <{}> (id {})", user.username, user.email, user.id),
        None => println!("Not signed in."),
    }
    Ok(())
}

async fn list(controller: &TaskController, args: ListArgs) -> Result<()> {
    require_session(controller).await?;
    controller.set_status_filter(args.status).await;
    controller.set_priority_filter(args.priority).await;
    if let Err(error) = controller.run_search().await {
        return Err(surface(controller, error).await);
    }
    print_tasks(&controller.visible_tasks().await);
    Ok(())
}

async fn search(controller: &TaskController, args: SearchArgs) -> Result<()> {
    require_session(controller).await?;
    let mode = match args.mode {
        SearchCommand::All => SearchMode::All,
        SearchCommand::Status { status } => SearchMode::Status(status),
        SearchCommand::Priority { priority } => SearchMode::Priority(priority),
        SearchCommand::Keyword { keyword } => SearchMode::Keyword(keyword),
        SearchCommand::Advanced(args) => SearchMode::Advanced(advanced_query(args)?),
    };
    if let Err(error) = controller.search(mode).await {
        return Err(surface(controller, error).await);
    }
    print_tasks(&controller.tasks().await);
    Ok(())
}

fn advanced_query(args: AdvancedArgs) -> Result<AdvancedQuery> {
    let deadline_from = match args.deadline_from {
        Some(raw) => parse_deadline_input(&raw).map_err(|e| anyhow!(e.to_string()))?,
        None => None,
    };
    let deadline_to = match args.deadline_to {
        Some(raw) => parse_deadline_input(&raw).map_err(|e| anyhow!(e.to_string()))?,
        None => None,
    };
    Ok(AdvancedQuery {
        keyword: args.keyword,
        status: args.status,
        priority: args.priority,
        deadline_from,
        deadline_to,
        page: args.page,
        size: args.size,
    })
}

async fn sync(controller: &TaskController) -> Result<()> {
    require_session(controller).await?;
    if let Err(error) = controller.resync().await {
        return Err(surface(controller, error).await);
    }
    print_tasks(&controller.tasks().await);
    Ok(())
}

async fn stats(controller: &TaskController) -> Result<()> {
    require_session(controller).await?;
    if let Err(error) = controller.run_search().await {
        return Err(surface(controller, error).await);
    }
    print_stats(&controller.stats().await);
    Ok(())
}

async fn create(controller: &TaskController, args: CreateArgs) -> Result<()> {
    require_session(controller).await?;
    let input = TaskInput {
        title: args.title,
        description: args.description,
        status: args.status,
        priority: args.priority,
        deadline: args.deadline,
    };
    if let Err(error) = controller.create_task(input).await {
        return Err(surface(controller, error).await);
    }
    println!("Task created.");
    print_tasks(&controller.visible_tasks().await);
    Ok(())
}

async fn edit(controller: &TaskController, args: EditArgs) -> Result<()> {
    require_session(controller).await?;

    // Hydrate the authoritative set so the existing record can seed
    // the unchanged fields.
    if let Err(error) = controller.run_search().await {
        return Err(surface(controller, error).await);
    }
    let Some(existing) = controller.tasks().await.into_iter().find(|t| t.id == args.id) else {
        bail!("Task {} is not in the current task list.", args.id);
    };

    let input = TaskInput {
        title: args.title.unwrap_or(existing.title),
        description: args.description.unwrap_or(existing.description),
        status: args.status.unwrap_or(existing.status),
        priority: args.priority.unwrap_or(existing.priority),
        deadline: match args.deadline {
            Some(raw) => raw,
            None => existing
                .deadline
                .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
        },
    };
    if let Err(error) = controller.update_task(args.id, input).await {
        return Err(surface(controller, error).await);
    }
    println!("Task {} updated.", args.id);
    Ok(())
}

async fn status(controller: &TaskController, args: StatusArgs) -> Result<()> {
    require_session(controller).await?;
    if let Err(error) = controller.run_search().await {
        return Err(surface(controller, error).await);
    }
    if !controller.tasks().await.iter().any(|t| t.id == args.id) {
        println!("Task {} is not in the current task list.", args.id);
        return Ok(());
    }
    if let Err(error) = controller.change_status(args.id, args.status).await {
        return Err(surface(controller, error).await);
    }
    println!("Task {} is now {}.", args.id, args.status);
    Ok(())
}

async fn priority(controller: &TaskController, args: PriorityArgs) -> Result<()> {
    require_session(controller).await?;
    if let Err(error) = controller.run_search().await {
        return Err(surface(controller, error).await);
    }
    if !controller.tasks().await.iter().any(|t| t.id == args.id) {
        println!("Task {} is not in the current task list.", args.id);
        return Ok(());
    }
    if let Err(error) = controller.change_priority(args.id, args.priority).await {
        return Err(surface(controller, error).await);
    }
    println!("Task {} priority set to {}.", args.id, args.priority);
    Ok(())
}

async fn delete(controller: &TaskController, args: DeleteArgs) -> Result<()> {
    require_session(controller).await?;
    let confirmed = args.yes || confirm(&format!("Delete task {}? [y/N] ", args.id))?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }
    if let Err(error) = controller.delete_task(args.id, confirmed).await {
        return Err(surface(controller, error).await);
    }
    println!("Task {} deleted.", args.id);
    Ok(())
}

async fn require_session(controller: &TaskController) -> Result<()> {
    if controller.is_authenticated().await {
        Ok(())
    } else {
        bail!("Not signed in. Run `taskflow login <email> <password>` first.")
    }
}

/// Prefer the controller's surfaced message over the raw error chain.
async fn surface(controller: &TaskController, error: ControllerError) -> anyhow::Error {
    match controller.error_message().await {
        Some(message) => anyhow!(message),
        None => anyhow::Error::new(error),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found. Create your first task or adjust your search criteria.");
        return;
    }
    println!(
        "{:<6} {:<12} {:<8} {:<17} TITLE",
        "ID", "STATUS", "PRIORITY", "DEADLINE"
    );
    for task in tasks {
        let deadline = task
            .deadline
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<12} {:<8} {:<17} {}",
            task.id, task.status, task.priority, deadline, task.title
        );
        if !task.description.is_empty() {
            println!("       {}", task.description);
        }
    }
}

fn print_stats(stats: &TaskStats) {
    println!("Total:       {}", stats.total);
    println!("To do:       {}", stats.todo);
    println!("In progress: {}", stats.in_progress);
    println!("Done:        {}", stats.done);
    println!("Overdue:     {}", stats.overdue);
    println!("Cancelled:   {}", stats.cancelled);
}
