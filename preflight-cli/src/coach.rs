use dialoguer::Input;
use preflight_client::{ApiClient, CoachingClient, CoachingError, CoachingErrorKind, StatusCode};
use preflight_form::{CoachTurn, RunId, SessionStatus, TurnRole};

/// Typed at the prompt to leave the conversation.
const QUIT: &str = "/quit";

pub async fn run(api: &ApiClient, run_id: RunId, pipeline: Option<&str>) -> anyhow::Result<()> {
    let coaching = api.coaching();

    if !open(&coaching, run_id, pipeline).await? {
        return Ok(());
    }
    println!("(type {QUIT} or an empty line to finish)");

    loop {
        let message = Input::<String>::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        let message = message.trim();
        if message.is_empty() || message == QUIT {
            break;
        }

        match coaching.message(run_id, message).await {
            Ok(reply) => {
                print_turn(&reply.assistant_turn);
                if reply.is_final() {
                    println!("That was the last round of this coaching session.");
                    return Ok(());
                }
                println!("({} of {} rounds left)", reply.remaining_rounds, reply.max_rounds);
            }
            Err(err) => match err.kind() {
                CoachingErrorKind::RateLimit => println!("{}", rate_limit_notice(&err)),
                CoachingErrorKind::SessionEnded => {
                    println!("This coaching session has ended: {err}");
                    return Ok(());
                }
                CoachingErrorKind::ApiError => return Err(err.into()),
            },
        }
    }

    match coaching.end(run_id).await {
        Ok(ended) => println!("{}", ended.message),
        Err(err) if err.kind() == CoachingErrorKind::SessionEnded => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Start a session, or pick up the existing one. Returns whether it is still active.
async fn open(
    coaching: &CoachingClient,
    run_id: RunId,
    pipeline: Option<&str>,
) -> anyhow::Result<bool> {
    match coaching.start(run_id, pipeline).await {
        Ok(started) => {
            print_turn(&started.initial_message);
            Ok(true)
        }
        Err(err) if err.status() == Some(StatusCode::CONFLICT) => {
            tracing::info!(%run_id, "coaching session exists, loading history");
            let history = coaching.history(run_id).await?;
            for turn in &history.turns {
                print_turn(turn);
            }

            let session = &history.session;
            if session.status == SessionStatus::Active && session.current_round < session.max_rounds {
                Ok(true)
            } else {
                println!("This coaching session has ended.");
                Ok(false)
            }
        }
        Err(err) => Err(err.into()),
    }
}

fn print_turn(turn: &CoachTurn) {
    let speaker = match turn.role {
        TurnRole::User => "You",
        TurnRole::Assistant => "Coach",
        TurnRole::Other => "System",
    };
    println!();
    println!("{speaker}: {}", turn.content);
    println!();
}

fn rate_limit_notice(err: &CoachingError) -> String {
    match err.retry_after() {
        Some(secs) => format!("{err} Please wait {secs} seconds and send your message again."),
        None => format!("{err} Please wait a moment and send your message again."),
    }
}
