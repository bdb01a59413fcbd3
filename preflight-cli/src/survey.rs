use std::path::Path;

use anyhow::Context;
use preflight_client::{ApiClient, FormsClient};
use preflight_form::{
    FormDefinition, PageAction, PageBackend, PendingSave, RunId, Step, SurveySession,
};

use crate::cli::SurveyArgs;

pub async fn run<B>(api: &ApiClient, backend: &B, args: SurveyArgs) -> anyhow::Result<()>
where
    B: PageBackend,
{
    let forms = api.forms();
    let definition = forms
        .get_form_definition(&args.form, args.version.as_deref())
        .await
        .with_context(|| format!("Could not load form '{}'", args.form))?;

    let mut session = match args.resume {
        Some(run_id) => {
            let run = forms.get_run(run_id).await?;
            SurveySession::resume(definition, &run)?
        }
        None => {
            let run = forms
                .create_run(&args.form, Some(definition.meta.version.as_str()))
                .await?;
            println!("Started run {}", run.run_id);
            SurveySession::new(definition, run.run_id)?
        }
    };

    collect_online(&mut session, backend, &forms).await?;

    let run_id = session.run_id();
    let completed = forms.complete_run(run_id).await?;
    println!("Run {run_id} completed at {}", completed.completed_at);
    println!("Talk it through with: preflight coach {run_id}");
    Ok(())
}

/// The async twin of `drive`: every save is awaited before the page changes, and
/// a failed save leaves the user on the page they submitted.
async fn collect_online<B>(
    session: &mut SurveySession,
    backend: &B,
    forms: &FormsClient,
) -> anyhow::Result<()>
where
    B: PageBackend,
{
    while !session.is_complete() {
        let position = session.position();
        let mut state = session.page_state();
        let action = backend
            .collect_page(&mut state, position)
            .map_err(Into::<anyhow::Error>::into)?;
        let (answers, errors) = state.into_parts();
        session.commit(answers, errors);

        match action {
            PageAction::Back => {
                session.back();
            }
            PageAction::Next => match session.advance() {
                Step::Invalid(errors) => {
                    println!("Please fix {} field(s) before continuing.", errors.len());
                }
                Step::Proceed(transition) => {
                    match save_all(forms, session.run_id(), &transition.saves).await {
                        Ok(()) => session.enter(transition.destination),
                        Err(err) => {
                            tracing::warn!(error = %err, "save failed, staying on page");
                            println!("Could not save your answers: {err:#}");
                            println!("Nothing was lost. Submit the page again to retry.");
                        }
                    }
                }
            },
        }
    }

    Ok(())
}

async fn save_all(forms: &FormsClient, run_id: RunId, saves: &[PendingSave]) -> anyhow::Result<()> {
    for pending in saves {
        forms
            .save_answers(run_id, &pending.page_id, &pending.answers)
            .await
            .with_context(|| format!("saving page '{}'", pending.page_id))?;
    }
    Ok(())
}

pub fn load_definition(path: &Path) -> anyhow::Result<FormDefinition> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let definition: FormDefinition = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a form definition", path.display()))?;
    definition.check()?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("preflight-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_a_definition_file() {
        let dir = scratch_dir("definition");
        let path = dir.join("form.json");
        std::fs::write(
            &path,
            r#"{
                "id": "local",
                "title": "Local",
                "pages": [
                    {"id": "p1", "title": "One", "blocks": [
                        {"type": "text", "name": "role", "required": true},
                        {"type": "checkbox", "name": "agree"}
                    ]}
                ],
                "meta": {"version": "1"}
            }"#,
        )
        .unwrap();

        let definition = load_definition(&path).unwrap();
        assert_eq!(definition.id, "local");
        assert!(definition.navigation.autosave);
        assert_eq!(definition.pages[0].blocks.len(), 2);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn broken_definition_is_reported() {
        let dir = scratch_dir("broken");
        let path = dir.join("form.json");
        std::fs::write(&path, r#"{"id": "x", "title": "X", "pages": [], "meta": {"version": "1"}}"#)
            .unwrap();

        assert!(load_definition(&path).is_err());
        assert!(load_definition(&dir.join("missing.json")).is_err());

        std::fs::remove_dir_all(dir).ok();
    }
}
