//! The `vocadrill play` command.
//!
//! Drives one interactive session in the terminal. The state machine's
//! advance delays are honored with real sleeps; the game clock of the
//! tick-driven variants is advanced from the input loop (an empty line lets
//! time pass).

use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use vocadrill_client::{load_config_from, MetadataClient};
use vocadrill_core::engine::ChallengeEngine;
use vocadrill_core::generator::{matching_layout, MatchingLayout, Prompt};
use vocadrill_core::model::{ChallengeKind, Notification};
use vocadrill_core::report::SessionReport;
use vocadrill_core::session::{Effect, Session, SessionEvent, BLITZ_FLOOR};
use vocadrill_core::traits::DrillApi;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    kind: String,
    challenge: String,
    drill: String,
    seed: Option<u64>,
    base_url: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    no_report: bool,
) -> Result<()> {
    let kind: ChallengeKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let config = load_config_from(config_path.as_deref())?;
    let base_url = base_url.unwrap_or_else(|| config.base_url.clone());
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let engine = ChallengeEngine::new(MetadataClient::new(base_url));
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let Some(mut session) = engine.start(kind, &challenge, &drill, &mut rng).await else {
        println!("No playable items found for this challenge.");
        return Ok(());
    };

    println!(
        "Playing {} with {} items. Good luck!",
        kind,
        session.questions().len()
    );

    match kind {
        ChallengeKind::ContextMaster => play_quiz(&engine, &mut session).await?,
        ChallengeKind::WordScramble => play_scramble(&engine, &mut session).await?,
        ChallengeKind::MatchMeaning => {
            let layout = matching_layout(session.questions().len(), &mut rng);
            play_matching(&engine, &mut session, &layout).await?
        }
        ChallengeKind::FlashcardBlitz => play_blitz(&engine, &mut session).await?,
        ChallengeKind::SpeedTyper => play_typer(&engine, &mut session).await?,
    }

    // The submitter left its outcome in the flash slot; this is where the
    // "next page" reads it, once.
    if let Some(flash) = engine.mailbox().take() {
        print_notification(&flash);
    }

    print_summary(&session);

    if !no_report {
        let report = SessionReport::from_session(&session, &drill);
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = output_dir.join(format!("session-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

async fn play_quiz<A: DrillApi>(engine: &ChallengeEngine<A>, session: &mut Session) -> Result<()> {
    while !session.is_completed() {
        let (sentence, options) = {
            let Some(q) = session.current_question() else {
                break;
            };
            let Prompt::ContextQuiz { sentence, options } = &q.prompt else {
                break;
            };
            (sentence.clone(), options.clone())
        };

        println!(
            "\nQuestion {}/{}",
            session.current_index() + 1,
            session.questions().len()
        );
        println!("  {sentence}");
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {option}", i + 1);
        }

        let input = prompt_line("Your answer (number): ")?;
        let Ok(choice) = input.trim().parse::<usize>() else {
            eprintln!("  Enter the number of an option.");
            continue;
        };
        if choice == 0 || choice > options.len() {
            eprintln!("  Enter a number between 1 and {}.", options.len());
            continue;
        }

        let effects = session.apply(SessionEvent::OptionChosen(choice - 1));
        print_verdict(session);
        drain_effects(engine, session, effects).await;
    }
    Ok(())
}

async fn play_scramble<A: DrillApi>(
    engine: &ChallengeEngine<A>,
    session: &mut Session,
) -> Result<()> {
    while !session.is_completed() {
        let letters = {
            let Some(q) = session.current_question() else {
                break;
            };
            let Prompt::WordScramble { letters } = &q.prompt else {
                break;
            };
            letters.clone()
        };

        println!(
            "\nWord {}/{}",
            session.current_index() + 1,
            session.questions().len()
        );
        let spaced: String = letters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("  Unscramble: {spaced}");

        let input = prompt_line("Type the word (or 'skip'): ")?;
        let attempt = input.trim();
        if attempt.eq_ignore_ascii_case("skip") {
            let effects = session.apply(SessionEvent::ScrambleSkipped);
            print_verdict(session);
            drain_effects(engine, session, effects).await;
            continue;
        }

        let Some(picks) = picks_for(&letters, attempt) else {
            eprintln!("  Use exactly the letters shown.");
            session.apply(SessionEvent::PicksCleared);
            continue;
        };
        let before = session.answers().len();
        for pick in picks {
            let effects = session.apply(SessionEvent::LetterPicked(pick));
            drain_effects(engine, session, effects).await;
        }
        if session.answers().len() > before {
            print_verdict(session);
        }
    }
    Ok(())
}

/// Translate a typed attempt into letter-pick positions, or `None` when the
/// attempt does not use exactly the letters shown.
fn picks_for(letters: &[char], attempt: &str) -> Option<Vec<usize>> {
    let mut used = vec![false; letters.len()];
    let mut picks = Vec::with_capacity(letters.len());
    for ch in attempt.chars() {
        let position = letters
            .iter()
            .enumerate()
            .position(|(i, l)| !used[i] && l.eq_ignore_ascii_case(&ch))?;
        used[position] = true;
        picks.push(position);
    }
    if picks.len() == letters.len() {
        Some(picks)
    } else {
        None
    }
}

async fn play_matching<A: DrillApi>(
    engine: &ChallengeEngine<A>,
    session: &mut Session,
    layout: &MatchingLayout,
) -> Result<()> {
    println!("\nPair each word (w#) with its meaning (m#), e.g. 'w2 m3'.");
    while !session.is_completed() {
        render_matching_board(session, layout);

        let input = prompt_line("Pair: ")?;
        let Some((word_slot, meaning_slot)) = parse_pair(input.trim()) else {
            eprintln!("  Enter a pair like 'w2 m3'.");
            continue;
        };
        let (Some(&word_idx), Some(&meaning_idx)) = (
            layout.word_slots.get(word_slot),
            layout.meaning_slots.get(meaning_slot),
        ) else {
            eprintln!("  No such slot on the board.");
            continue;
        };

        let effects = session.apply(SessionEvent::WordChosen(word_idx));
        drain_effects(engine, session, effects).await;
        let before = session.answers().len();
        let effects = session.apply(SessionEvent::MeaningChosen(meaning_idx));
        if session.answers().len() > before {
            print_verdict(session);
        }
        drain_effects(engine, session, effects).await;
    }
    Ok(())
}

fn render_matching_board(session: &Session, layout: &MatchingLayout) {
    let (matched, incorrect) = session
        .matching_state()
        .map(|(m, i)| (m.clone(), i.clone()))
        .unwrap_or_default();
    println!();
    for (slot, &qi) in layout.word_slots.iter().enumerate() {
        let marker = if matched.contains(&qi) {
            "+"
        } else if incorrect.contains(&qi) {
            "x"
        } else {
            " "
        };
        println!("  w{} [{marker}] {}", slot + 1, session.questions()[qi].word);
    }
    for (slot, &qi) in layout.meaning_slots.iter().enumerate() {
        println!(
            "  m{}     {}",
            slot + 1,
            session.questions()[qi].correct_answer
        );
    }
}

fn parse_pair(input: &str) -> Option<(usize, usize)> {
    let mut word_slot = None;
    let mut meaning_slot = None;
    for token in input.split_whitespace() {
        let rest = token.get(1..)?;
        let number: usize = rest.parse().ok()?;
        let slot = number.checked_sub(1)?;
        match token.chars().next()? {
            'w' | 'W' => word_slot = Some(slot),
            'm' | 'M' => meaning_slot = Some(slot),
            _ => return None,
        }
    }
    Some((word_slot?, meaning_slot?))
}

async fn play_blitz<A: DrillApi>(engine: &ChallengeEngine<A>, session: &mut Session) -> Result<()> {
    println!("\nDefinitions are falling. Type the matching word to catch one; press Enter to let them fall.");
    while !session.is_completed() {
        let falling: Vec<(String, u32)> = session
            .falling_cards()
            .iter()
            .filter(|c| c.active && !c.resolved)
            .map(|c| {
                (
                    session.questions()[c.question].question_text.clone(),
                    c.row,
                )
            })
            .collect();
        println!();
        if falling.is_empty() {
            println!("  (waiting for the next card)");
        }
        for (meaning, row) in falling {
            println!("  {row:>2}/{BLITZ_FLOOR}  {meaning}");
        }

        let input = prompt_line("> ")?;
        if !input.trim().is_empty() {
            let before = session.answers().len();
            let effects = session.apply(SessionEvent::WordTyped(input.trim().to_string()));
            if session.answers().len() > before {
                println!("  Caught!");
            } else {
                println!("  Nothing matched that word.");
            }
            drain_effects(engine, session, effects).await;
        }
        if !session.is_completed() {
            let effects = session.apply(SessionEvent::Tick);
            drain_effects(engine, session, effects).await;
        }
    }
    Ok(())
}

async fn play_typer<A: DrillApi>(engine: &ChallengeEngine<A>, session: &mut Session) -> Result<()> {
    println!("\nType each word before the clock runs out. An empty line lets time pass.");
    while !session.is_completed() {
        let display = {
            let Some(q) = session.current_question() else {
                break;
            };
            q.question_text.clone()
        };
        println!(
            "\n  Type: {display}   (lives {}, clock {})",
            session.lives().unwrap_or(0),
            session.ticks_left().unwrap_or(0)
        );

        let input = prompt_line("> ")?;
        let before = session.answers().len();
        let effects = if input.trim().is_empty() {
            session.apply(SessionEvent::Tick)
        } else {
            session.apply(SessionEvent::WordTyped(input.trim().to_string()))
        };
        if session.answers().len() > before {
            print_verdict(session);
        }
        drain_effects(engine, session, effects).await;
    }
    Ok(())
}

/// Run the effects a transition produced: honor advance delays with real
/// sleeps, print notifications, and submit on completion. Tick scheduling is
/// ignored here because the terminal UI drives the clock from its input loop.
async fn drain_effects<A: DrillApi>(
    engine: &ChallengeEngine<A>,
    session: &mut Session,
    effects: Vec<Effect>,
) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::ScheduleAdvance(delay) => {
                tokio::time::sleep(delay).await;
                queue.extend(session.apply(SessionEvent::AdvanceFired));
            }
            Effect::ScheduleTick(_) => {}
            Effect::Notify(n) => print_notification(&n),
            Effect::SubmitResults => {
                engine.submit(session).await;
            }
        }
    }
}

fn print_verdict(session: &Session) {
    if let Some(answer) = session.answers().last() {
        if answer.is_correct {
            println!("  Correct!");
        } else {
            println!("  Wrong. The answer was: {}", answer.question.correct_answer);
        }
    }
}

fn print_notification(n: &Notification) {
    eprintln!("  [{}] {}", n.severity, n.message);
}

fn print_summary(session: &Session) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Word", "Your answer", "Correct answer", "Result"]);
    for (i, answer) in session.answers().iter().enumerate() {
        let result = if answer.is_correct {
            "correct"
        } else if answer.user_response.is_none() {
            "missed"
        } else {
            "wrong"
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&answer.question.word),
            Cell::new(answer.user_response.as_deref().unwrap_or("-")),
            Cell::new(&answer.question.correct_answer),
            Cell::new(result),
        ]);
    }
    println!("\n{table}");

    let total = session.answers().len();
    let percent = if total == 0 {
        0.0
    } else {
        session.score() as f64 * 100.0 / total as f64
    };
    println!("Score: {}/{} ({percent:.0}%)", session.score(), total);
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        anyhow::bail!("input ended before the session completed");
    }
    Ok(line)
}
