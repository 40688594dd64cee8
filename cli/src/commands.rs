//! One-shot subcommands: create and delete.

use anyhow::{bail, Context, Result};
use tracing::info;
use zoo_core::{CreateForm, DeleteOutcome, DeleteTool, StyleRegistry, SubmitOutcome, Transport, ZooClient};

use crate::config::{CreateArgs, DeleteArgs};
use crate::prompt;
use crate::render;

fn field_prompt(form: &CreateForm, name: &str) -> String {
    let Some(field) = form.kind().field(name) else {
        return format!("{name}: ");
    };
    let mut question = field.label.to_string();
    if !field.is_required() {
        question.push_str(" (optional)");
    }
    if let Some(options) = form.options(field.name) {
        question.push_str(&format!(" [{}]", options.join(", ")));
    }
    if let Some(error) = form.errors().get(field.name) {
        question = format!("{error}\n{question}");
    }
    question.push_str(": ");
    question
}

/// Fill the form from `--field` pairs, prompt for the rest, and submit.
/// Invalid fields are asked again until the form validates.
pub fn create<T: Transport>(transport: &T, client: &ZooClient, args: CreateArgs) -> Result<()> {
    let styles = StyleRegistry::new();
    let mut form = CreateForm::new(args.kind);
    let _style = styles.enter(form.style());

    if form.load_options(transport, client).is_err() {
        if let Some(notice) = form.notice() {
            render::print_notice(notice);
        }
        bail!("cannot create a {} without its reference lists", args.kind);
    }

    for (name, value) in &args.fields {
        if !form.set(name, value.as_str()) {
            bail!("{} has no field `{name}`", args.kind);
        }
    }

    let mut pending: Vec<&'static str> = form
        .kind()
        .fields()
        .iter()
        .filter(|f| form.record().get(f.name).is_empty())
        .map(|f| f.name)
        .collect();

    loop {
        for name in pending.drain(..) {
            let question = field_prompt(&form, name);
            let Some(answer) = prompt::ask(&question)? else {
                bail!("input ended before the form was complete");
            };
            form.set(name, answer);
        }

        match form.submit(transport, client) {
            SubmitOutcome::Created { id } => {
                info!(%id, "created");
                if let Some(notice) = form.notice() {
                    render::print_notice(notice);
                }
                return Ok(());
            }
            SubmitOutcome::Invalid => {
                if let Some(notice) = form.notice() {
                    render::print_notice(notice);
                }
                pending = form.errors().keys().copied().collect();
            }
            SubmitOutcome::Duplicate { .. } => {
                if let Some(notice) = form.notice() {
                    render::print_notice(notice);
                }
                pending = vec![form.kind().resource().id_field()];
            }
            SubmitOutcome::NotReady | SubmitOutcome::Failed => {
                if let Some(notice) = form.notice() {
                    render::print_notice(notice);
                }
                bail!("{} was not created", args.kind);
            }
        }
    }
}

/// List the collection's IDs, pick one, confirm and delete it.
pub fn delete<T: Transport>(transport: &T, client: &ZooClient, args: DeleteArgs) -> Result<()> {
    let styles = StyleRegistry::new();
    let mut tool = DeleteTool::new();
    let _style = styles.enter(tool.style());

    if tool.select_resource(transport, client, args.resource).is_err() {
        if let Some(notice) = tool.notice() {
            render::print_notice(notice);
        }
        bail!("could not list {}", args.resource);
    }

    let id = match args.id {
        Some(id) => id,
        None => {
            if tool.ids().is_empty() {
                println!("No {} to delete.", args.resource);
                return Ok(());
            }
            println!("{}", tool.ids().join("  "));
            prompt::ask(&format!("{} ID to delete: ", args.resource.singular()))?
                .context("no ID given")?
        }
    };
    tool.select(id);

    let yes = args.yes;
    let mut confirm = |question: &str| yes || prompt::confirm(question);
    let outcome = tool.delete(transport, client, &mut confirm);
    if let Some(notice) = tool.notice() {
        render::print_notice(notice);
    }
    match outcome {
        DeleteOutcome::Deleted { .. } | DeleteOutcome::Declined => Ok(()),
        DeleteOutcome::Rejected(err) => Err(err.into()),
        DeleteOutcome::Failed => bail!("delete failed"),
    }
}
