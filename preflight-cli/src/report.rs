use anyhow::Context;
use preflight_client::ApiClient;
use preflight_form::{FormAnswers, RunId, RunSummary, answers_to_form_answers};
use preflight_html_document::{HtmlOptions, form_to_html};

use crate::cli::RenderArgs;
use crate::survey::load_definition;

pub async fn render(api: &ApiClient, args: RenderArgs) -> anyhow::Result<()> {
    let definition = match &args.definition {
        Some(path) => load_definition(path)?,
        None => api
            .forms()
            .get_form_definition(&args.form, args.version.as_deref())
            .await
            .with_context(|| format!("Could not load form '{}'", args.form))?,
    };

    let answers = match args.run {
        Some(run_id) => answers_to_form_answers(&api.forms().get_run(run_id).await?.answers),
        None => FormAnswers::new(),
    };

    let options = HtmlOptions::new().with_title(definition.title.clone());
    let html = form_to_html(&definition, &answers, &options);

    match &args.output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Could not write {}", path.display()))?;
            tracing::info!(path = %path.display(), form = %definition.id, "wrote HTML");
        }
        None => print!("{html}"),
    }
    Ok(())
}

pub async fn status(api: &ApiClient, run_id: RunId) -> anyhow::Result<()> {
    let run = api.forms().get_run(run_id).await?;
    print!("{}", describe_run(&run));
    Ok(())
}

fn describe_run(run: &RunSummary) -> String {
    let mut out = String::new();
    let status = if run.status.is_completed() {
        "completed"
    } else {
        "in progress"
    };

    out.push_str(&format!("Run {} ({status})\n", run.run_id));
    out.push_str(&format!("  started:   {}\n", run.started_at));
    if let Some(completed_at) = run.completed_at {
        out.push_str(&format!("  completed: {completed_at}\n"));
    }
    if let Some(last_page) = &run.last_page {
        out.push_str(&format!("  last page: {last_page}\n"));
    }

    let answers = answers_to_form_answers(&run.answers);
    if answers.is_empty() {
        out.push_str("  no answers saved\n");
    }
    for (page_id, page) in answers.iter() {
        out.push_str(&format!("  [{page_id}]\n"));
        for (field, value) in page.iter() {
            let shown = match value.as_list() {
                Some(list) => list
                    .iter()
                    .map(|option| option.display_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                None => value.display_string(),
            };
            out.push_str(&format!("    {field}: {shown}\n"));
        }
    }

    out
}
