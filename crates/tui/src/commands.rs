use std::io::Write;

use anyhow::{anyhow, bail, Result};
use tracing::info;

use crate::cli::{AddArgs, CliCommand, DeleteArgs, DoneArgs, ListArgs};
use crate::components::{empty_message, TaskForm, DELETE_PROMPT};
use crate::core::services::tasks_from_body;
use crate::core::{Reply, Request, TasksService};
use crate::model::{StatusFilter, Task, TaskId, TaskStatus};

pub async fn execute<W: Write>(
    service: &TasksService,
    command: CliCommand,
    mut writer: W,
) -> Result<()> {
    match command {
        CliCommand::List(args) => handle_list(service, &args, &mut writer).await,
        CliCommand::Add(args) => handle_add(service, args, &mut writer).await,
        CliCommand::Done(args) => handle_done(service, &args, &mut writer).await,
        CliCommand::Delete(args) => handle_delete(service, &args, &mut writer).await,
        CliCommand::Tui => Err(anyhow!("launch the terminal UI directly")),
    }
}

async fn handle_list<W: Write>(service: &TasksService, args: &ListArgs, mut writer: W) -> Result<()> {
    let body = service.api().list_tasks(args.status.clone()).await?;
    let tasks = tasks_from_body(body);
    if tasks.is_empty() {
        writeln!(writer, "{}", empty_message(filter_for(args.status.as_ref())))?;
        return Ok(());
    }
    for task in &tasks {
        writeln!(writer, "{}", format_task_line(task))?;
    }
    Ok(())
}

async fn handle_add<W: Write>(service: &TasksService, args: AddArgs, mut writer: W) -> Result<()> {
    let mut form = TaskForm::new();
    form.set_title(args.title.unwrap_or_default());
    form.set_description(args.description.unwrap_or_default());
    form.set_category(args.category);
    form.set_deadline(args.deadline.unwrap_or_default());

    let Some(request) = form.submit() else {
        bail!("{}", form.error().unwrap_or("Task is incomplete"));
    };
    let Reply::Created(result) = service.execute(request).await else {
        bail!("unexpected reply to create request");
    };
    let created = match form.finish_submit(result) {
        Some(task) => task,
        None => bail!("{}", form.error().unwrap_or("Task was not created")),
    };

    writeln!(writer, "Task created successfully!")?;
    writeln!(writer, "{}", format_task_line(&created))?;
    Ok(())
}

async fn handle_done<W: Write>(service: &TasksService, args: &DoneArgs, mut writer: W) -> Result<()> {
    let id = TaskId::new(args.id.as_str());
    service.api().complete_task(&id).await?;
    info!(id = %id, "task completed from cli");
    writeln!(writer, "Marked task {} as completed", id)?;
    Ok(())
}

async fn handle_delete<W: Write>(
    service: &TasksService,
    args: &DeleteArgs,
    mut writer: W,
) -> Result<()> {
    if !args.yes {
        bail!("{} Re-run with --yes to delete task {}.", DELETE_PROMPT, args.id);
    }
    let id = TaskId::new(args.id.as_str());
    match service.execute(Request::Delete(id)).await {
        Reply::Deleted { result, .. } => {
            result?;
        }
        _ => bail!("unexpected reply to delete request"),
    }
    writeln!(writer, "Task deleted successfully!")?;
    Ok(())
}

fn filter_for(status: Option<&TaskStatus>) -> StatusFilter {
    match status {
        Some(TaskStatus::Pending) => StatusFilter::Pending,
        Some(TaskStatus::Completed) => StatusFilter::Completed,
        _ => StatusFilter::All,
    }
}

pub fn format_task_line(task: &Task) -> String {
    format!(
        "{:<6} {:<10} {:<10} {}",
        task.id,
        task.status.label(),
        task.category.label(),
        task.title
    )
}
