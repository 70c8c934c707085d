//! The challenge session state machine.
//!
//! One [`Session`] owns the full state of one gameplay session: the question
//! list, the cursor, the accumulated answers, and the per-variant transient
//! state. Transitions are driven exclusively through [`Session::apply`],
//! which performs no I/O and starts no timers; anything the host must do
//! (sleep then fire [`SessionEvent::AdvanceFired`], show a notification,
//! submit the results) comes back as [`Effect`] values. Timer expiry is an
//! explicit event, so tests simulate time instead of waiting on it.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::generator::{GeneratedQuestion, Prompt, TYPER_TICK_BUDGET};
use crate::model::{ChallengeKind, Notification};

/// Reveal gap after answering a multiple-choice item.
pub const QUIZ_ADVANCE_DELAY: Duration = Duration::from_millis(1200);
/// Gap after solving (or skipping) a scramble.
pub const SCRAMBLE_ADVANCE_DELAY: Duration = Duration::from_millis(800);
/// Gap after resolving a speed-typer word.
pub const TYPER_ADVANCE_DELAY: Duration = Duration::from_millis(500);
/// Falling-card tick interval.
pub const BLITZ_TICK_INTERVAL: Duration = Duration::from_millis(500);
/// Speed-typer clock interval.
pub const TYPER_TICK_INTERVAL: Duration = Duration::from_millis(1000);
/// Lives the speed-typer starts with.
pub const TYPER_LIVES: u32 = 3;
/// Row at which a falling card hits the floor and counts as missed.
pub const BLITZ_FLOOR: u32 = 20;
/// A new card activates every this many ticks.
pub const BLITZ_SPAWN_EVERY: u32 = 2;

/// One accumulated outcome, one per resolved question, in play order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnswer {
    pub ref_id: String,
    pub user_response: Option<String>,
    pub is_correct: bool,
    pub question: GeneratedQuestion,
}

/// Player (or timer) input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Quiz: the player clicked option `n`.
    OptionChosen(usize),
    /// Scramble: the player picked the letter at scrambled position `n`.
    LetterPicked(usize),
    /// Scramble: the player cleared the letters picked so far.
    PicksCleared,
    /// Scramble: the player gave up on the current word.
    ScrambleSkipped,
    /// Matching: the player selected the word of question `n`.
    WordChosen(usize),
    /// Matching: the player clicked the meaning of question `n`.
    MeaningChosen(usize),
    /// Blitz/typer: the player typed a word.
    WordTyped(String),
    /// A game-clock tick elapsed (blitz fall step, typer countdown).
    Tick,
    /// The post-answer advance timer fired.
    AdvanceFired,
}

/// Work the host must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Sleep this long, then feed [`SessionEvent::AdvanceFired`].
    ScheduleAdvance(Duration),
    /// Sleep this long, then feed [`SessionEvent::Tick`].
    ScheduleTick(Duration),
    /// Show a transient notification.
    Notify(Notification),
    /// The session is complete; submit the accumulated answers. Emitted
    /// exactly once per session.
    SubmitResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPhase {
    Presented,
    Answered,
}

/// A definition card in flight during Flashcard Blitz.
#[derive(Debug, Clone)]
pub struct FallingCard {
    /// Index into the session's question list.
    pub question: usize,
    pub row: u32,
    pub active: bool,
    pub resolved: bool,
}

#[derive(Debug, Clone)]
enum VariantState {
    Quiz {
        selected: Option<usize>,
    },
    Scramble {
        picked: Vec<usize>,
        attempts: u32,
    },
    Matching {
        selected_word: Option<usize>,
        matched: BTreeSet<usize>,
        incorrect: BTreeSet<usize>,
    },
    Blitz {
        cards: Vec<FallingCard>,
        ticks: u32,
    },
    Typer {
        lives: u32,
        ticks_left: u32,
    },
}

enum PickOutcome {
    InProgress,
    Solved(String),
    Retry,
}

/// The state of one challenge gameplay session.
#[derive(Debug, Clone)]
pub struct Session {
    kind: ChallengeKind,
    challenge_ref_id: String,
    questions: Vec<GeneratedQuestion>,
    current: usize,
    score: u32,
    answers: Vec<SessionAnswer>,
    phase: Phase,
    item_phase: ItemPhase,
    variant: VariantState,
    submit_requested: bool,
}

impl Session {
    pub fn new(
        challenge_ref_id: impl Into<String>,
        kind: ChallengeKind,
        questions: Vec<GeneratedQuestion>,
    ) -> Self {
        let variant = match kind {
            ChallengeKind::ContextMaster => VariantState::Quiz { selected: None },
            ChallengeKind::WordScramble => VariantState::Scramble {
                picked: Vec::new(),
                attempts: 0,
            },
            ChallengeKind::MatchMeaning => VariantState::Matching {
                selected_word: None,
                matched: BTreeSet::new(),
                incorrect: BTreeSet::new(),
            },
            ChallengeKind::FlashcardBlitz => VariantState::Blitz {
                cards: questions
                    .iter()
                    .enumerate()
                    .map(|(i, _)| FallingCard {
                        question: i,
                        row: 0,
                        // The first card is airborne from the start.
                        active: i == 0,
                        resolved: false,
                    })
                    .collect(),
                ticks: 0,
            },
            ChallengeKind::SpeedTyper => VariantState::Typer {
                lives: TYPER_LIVES,
                ticks_left: tick_budget(questions.first()),
            },
        };
        Self {
            kind,
            challenge_ref_id: challenge_ref_id.into(),
            questions,
            current: 0,
            score: 0,
            answers: Vec::new(),
            phase: Phase::Playing,
            item_phase: ItemPhase::Presented,
            variant,
            submit_requested: false,
        }
    }

    /// Effects to run before the first player input (clock start for the
    /// tick-driven variants).
    pub fn initial_effects(&self) -> Vec<Effect> {
        match self.kind {
            ChallengeKind::FlashcardBlitz => vec![Effect::ScheduleTick(BLITZ_TICK_INTERVAL)],
            ChallengeKind::SpeedTyper => vec![Effect::ScheduleTick(TYPER_TICK_INTERVAL)],
            _ => Vec::new(),
        }
    }

    /// Apply one event and return the effects the host must run.
    ///
    /// Once the session is completed every further event is a no-op.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        if self.phase == Phase::Completed {
            return Vec::new();
        }
        match event {
            SessionEvent::OptionChosen(i) => self.on_option_chosen(i),
            SessionEvent::LetterPicked(i) => self.on_letter_picked(i),
            SessionEvent::PicksCleared => self.on_picks_cleared(),
            SessionEvent::ScrambleSkipped => self.on_scramble_skipped(),
            SessionEvent::WordChosen(i) => self.on_word_chosen(i),
            SessionEvent::MeaningChosen(i) => self.on_meaning_chosen(i),
            SessionEvent::WordTyped(s) => self.on_word_typed(&s),
            SessionEvent::Tick => self.on_tick(),
            SessionEvent::AdvanceFired => self.on_advance(),
        }
    }

    // --- quiz ---------------------------------------------------------

    fn on_option_chosen(&mut self, index: usize) -> Vec<Effect> {
        if self.kind != ChallengeKind::ContextMaster || self.item_phase != ItemPhase::Presented {
            return Vec::new();
        }
        let Some(q) = self.questions.get(self.current) else {
            return Vec::new();
        };
        let Prompt::ContextQuiz { options, .. } = &q.prompt else {
            return Vec::new();
        };
        let Some(response) = options.get(index).cloned() else {
            return Vec::new();
        };
        let correct = response == q.correct_answer;
        if let VariantState::Quiz { selected } = &mut self.variant {
            *selected = Some(index);
        }
        self.resolve_current(Some(response), correct);
        vec![Effect::ScheduleAdvance(QUIZ_ADVANCE_DELAY)]
    }

    // --- scramble -----------------------------------------------------

    fn on_letter_picked(&mut self, index: usize) -> Vec<Effect> {
        if self.kind != ChallengeKind::WordScramble || self.item_phase != ItemPhase::Presented {
            return Vec::new();
        }
        let Some(q) = self.questions.get(self.current) else {
            return Vec::new();
        };
        let Prompt::WordScramble { letters } = &q.prompt else {
            return Vec::new();
        };
        let letters = letters.clone();
        let target = q.correct_answer.clone();

        let outcome = match &mut self.variant {
            VariantState::Scramble { picked, attempts } => {
                if index >= letters.len() || picked.contains(&index) {
                    return Vec::new();
                }
                picked.push(index);
                if picked.len() < letters.len() {
                    PickOutcome::InProgress
                } else {
                    let assembled: String = picked.iter().map(|&i| letters[i]).collect();
                    if assembled == target {
                        PickOutcome::Solved(assembled)
                    } else {
                        *attempts += 1;
                        picked.clear();
                        PickOutcome::Retry
                    }
                }
            }
            _ => return Vec::new(),
        };

        match outcome {
            PickOutcome::InProgress => Vec::new(),
            PickOutcome::Solved(assembled) => {
                self.resolve_current(Some(assembled), true);
                vec![Effect::ScheduleAdvance(SCRAMBLE_ADVANCE_DELAY)]
            }
            PickOutcome::Retry => vec![Effect::Notify(Notification::info(
                "Not quite, try again.",
            ))],
        }
    }

    fn on_picks_cleared(&mut self) -> Vec<Effect> {
        if self.kind != ChallengeKind::WordScramble || self.item_phase != ItemPhase::Presented {
            return Vec::new();
        }
        if let VariantState::Scramble { picked, .. } = &mut self.variant {
            picked.clear();
        }
        Vec::new()
    }

    fn on_scramble_skipped(&mut self) -> Vec<Effect> {
        if self.kind != ChallengeKind::WordScramble || self.item_phase != ItemPhase::Presented {
            return Vec::new();
        }
        self.resolve_current(None, false);
        vec![Effect::ScheduleAdvance(SCRAMBLE_ADVANCE_DELAY)]
    }

    // --- matching -----------------------------------------------------

    fn on_word_chosen(&mut self, index: usize) -> Vec<Effect> {
        if self.kind != ChallengeKind::MatchMeaning || index >= self.questions.len() {
            return Vec::new();
        }
        if let VariantState::Matching {
            selected_word,
            matched,
            incorrect,
        } = &mut self.variant
        {
            // One chance per word: a resolved word is no longer clickable.
            if matched.contains(&index) || incorrect.contains(&index) {
                return Vec::new();
            }
            *selected_word = Some(index);
        }
        Vec::new()
    }

    fn on_meaning_chosen(&mut self, index: usize) -> Vec<Effect> {
        if self.kind != ChallengeKind::MatchMeaning || index >= self.questions.len() {
            return Vec::new();
        }
        let meaning = self.questions[index].correct_answer.clone();
        let total = self.questions.len();

        let (word_idx, correct, done) = match &mut self.variant {
            VariantState::Matching {
                selected_word,
                matched,
                incorrect,
            } => {
                let Some(w) = selected_word.take() else {
                    return vec![Effect::Notify(Notification::warning(
                        "Select a word first.",
                    ))];
                };
                if matched.contains(&w) || incorrect.contains(&w) {
                    return Vec::new();
                }
                let correct = w == index;
                if correct {
                    matched.insert(w);
                } else {
                    incorrect.insert(w);
                }
                (w, correct, matched.len() + incorrect.len() == total)
            }
            _ => return Vec::new(),
        };

        self.record_answer(word_idx, Some(meaning), correct);
        if done {
            self.complete()
        } else {
            Vec::new()
        }
    }

    // --- blitz / typer ------------------------------------------------

    fn on_word_typed(&mut self, typed: &str) -> Vec<Effect> {
        match self.kind {
            ChallengeKind::FlashcardBlitz => self.on_blitz_typed(typed),
            ChallengeKind::SpeedTyper => self.on_typer_typed(typed),
            _ => Vec::new(),
        }
    }

    fn on_tick(&mut self) -> Vec<Effect> {
        match self.kind {
            ChallengeKind::FlashcardBlitz => self.on_blitz_tick(),
            ChallengeKind::SpeedTyper => self.on_typer_tick(),
            _ => Vec::new(),
        }
    }

    fn on_blitz_tick(&mut self) -> Vec<Effect> {
        let speeds: Vec<u32> = self
            .questions
            .iter()
            .map(|q| match &q.prompt {
                Prompt::FlashcardBlitz { speed, .. } => *speed,
                _ => crate::generator::BLITZ_BASE_SPEED,
            })
            .collect();

        let mut missed = Vec::new();
        match &mut self.variant {
            VariantState::Blitz { cards, ticks } => {
                *ticks += 1;
                if *ticks % BLITZ_SPAWN_EVERY == 0 {
                    if let Some(card) = cards.iter_mut().find(|c| !c.active && !c.resolved) {
                        card.active = true;
                    }
                }
                for card in cards.iter_mut().filter(|c| c.active && !c.resolved) {
                    card.row += speeds[card.question];
                    if card.row >= BLITZ_FLOOR {
                        card.resolved = true;
                        missed.push(card.question);
                    }
                }
            }
            _ => return Vec::new(),
        }

        for question in missed {
            self.record_answer(question, None, false);
        }
        if self.answers.len() == self.questions.len() {
            return self.complete();
        }
        vec![Effect::ScheduleTick(BLITZ_TICK_INTERVAL)]
    }

    fn on_blitz_typed(&mut self, typed: &str) -> Vec<Effect> {
        let typed = typed.trim();
        if typed.is_empty() {
            return Vec::new();
        }
        let words: Vec<&str> = self
            .questions
            .iter()
            .map(|q| q.correct_answer.as_str())
            .collect();

        let caught = match &mut self.variant {
            VariantState::Blitz { cards, .. } => cards
                .iter_mut()
                .filter(|c| c.active && !c.resolved && words[c.question].eq_ignore_ascii_case(typed))
                .max_by_key(|c| c.row)
                .map(|c| {
                    c.resolved = true;
                    c.question
                }),
            _ => return Vec::new(),
        };

        let Some(question) = caught else {
            return Vec::new();
        };
        self.record_answer(question, Some(typed.to_string()), true);
        if self.answers.len() == self.questions.len() {
            self.complete()
        } else {
            Vec::new()
        }
    }

    fn on_typer_typed(&mut self, typed: &str) -> Vec<Effect> {
        if self.item_phase != ItemPhase::Presented {
            return Vec::new();
        }
        let Some(q) = self.questions.get(self.current) else {
            return Vec::new();
        };
        let correct = typed.trim().eq_ignore_ascii_case(&q.correct_answer);
        let response = Some(typed.trim().to_string());
        if correct {
            self.resolve_current(response, true);
            vec![Effect::ScheduleAdvance(TYPER_ADVANCE_DELAY)]
        } else {
            self.typer_miss(response)
        }
    }

    fn on_typer_tick(&mut self) -> Vec<Effect> {
        if self.item_phase != ItemPhase::Presented {
            // Between answer and advance the clock idles.
            return vec![Effect::ScheduleTick(TYPER_TICK_INTERVAL)];
        }
        let expired = match &mut self.variant {
            VariantState::Typer { ticks_left, .. } => {
                *ticks_left = ticks_left.saturating_sub(1);
                *ticks_left == 0
            }
            _ => return Vec::new(),
        };
        if !expired {
            return vec![Effect::ScheduleTick(TYPER_TICK_INTERVAL)];
        }
        let mut effects = self.typer_miss(None);
        if self.phase == Phase::Playing {
            effects.push(Effect::ScheduleTick(TYPER_TICK_INTERVAL));
        }
        effects
    }

    /// A wrong answer or an expired clock: one life gone, item resolved
    /// incorrect. At zero lives the session fails terminally and the rest of
    /// the queue resolves unanswered so every placeholder row gets a result.
    fn typer_miss(&mut self, response: Option<String>) -> Vec<Effect> {
        let lives_left = match &mut self.variant {
            VariantState::Typer { lives, .. } => {
                *lives = lives.saturating_sub(1);
                *lives
            }
            _ => return Vec::new(),
        };
        self.resolve_current(response, false);
        if lives_left == 0 {
            for i in (self.current + 1)..self.questions.len() {
                self.record_answer(i, None, false);
            }
            return self.complete();
        }
        vec![Effect::ScheduleAdvance(TYPER_ADVANCE_DELAY)]
    }

    // --- advancement --------------------------------------------------

    fn on_advance(&mut self) -> Vec<Effect> {
        if self.item_phase != ItemPhase::Answered {
            return Vec::new();
        }
        if self.current + 1 >= self.questions.len() {
            return self.complete();
        }
        self.current += 1;
        self.item_phase = ItemPhase::Presented;
        let budget = tick_budget(self.questions.get(self.current));
        match &mut self.variant {
            VariantState::Quiz { selected } => *selected = None,
            VariantState::Scramble { picked, .. } => picked.clear(),
            VariantState::Typer { ticks_left, .. } => *ticks_left = budget,
            _ => {}
        }
        Vec::new()
    }

    fn complete(&mut self) -> Vec<Effect> {
        self.phase = Phase::Completed;
        if self.submit_requested {
            return Vec::new();
        }
        self.submit_requested = true;
        vec![Effect::SubmitResults]
    }

    fn resolve_current(&mut self, response: Option<String>, correct: bool) {
        self.item_phase = ItemPhase::Answered;
        self.record_answer(self.current, response, correct);
    }

    fn record_answer(&mut self, index: usize, response: Option<String>, correct: bool) {
        let question = self.questions[index].clone();
        self.answers.push(SessionAnswer {
            ref_id: question.ref_id.clone(),
            user_response: response,
            is_correct: correct,
            question,
        });
        if correct {
            self.score += 1;
        }
    }

    // --- accessors ----------------------------------------------------

    pub fn kind(&self) -> ChallengeKind {
        self.kind
    }

    pub fn challenge_ref_id(&self) -> &str {
        &self.challenge_ref_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn item_phase(&self) -> ItemPhase {
        self.item_phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&GeneratedQuestion> {
        self.questions.get(self.current)
    }

    pub fn questions(&self) -> &[GeneratedQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[SessionAnswer] {
        &self.answers
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Scramble: the letters picked so far, in pick order.
    pub fn assembled(&self) -> String {
        let (VariantState::Scramble { picked, .. }, Some(q)) =
            (&self.variant, self.questions.get(self.current))
        else {
            return String::new();
        };
        let Prompt::WordScramble { letters } = &q.prompt else {
            return String::new();
        };
        picked.iter().filter_map(|&i| letters.get(i)).collect()
    }

    /// Scramble: how many failed assemblies the current session has seen.
    pub fn attempts(&self) -> u32 {
        match &self.variant {
            VariantState::Scramble { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    /// Matching: (matched, incorrect) question indices.
    pub fn matching_state(&self) -> Option<(&BTreeSet<usize>, &BTreeSet<usize>)> {
        match &self.variant {
            VariantState::Matching {
                matched, incorrect, ..
            } => Some((matched, incorrect)),
            _ => None,
        }
    }

    /// Matching: the currently selected (unresolved) word, if any.
    pub fn selected_word(&self) -> Option<usize> {
        match &self.variant {
            VariantState::Matching { selected_word, .. } => *selected_word,
            _ => None,
        }
    }

    /// Blitz: all cards, spawned or not.
    pub fn falling_cards(&self) -> &[FallingCard] {
        match &self.variant {
            VariantState::Blitz { cards, .. } => cards,
            _ => &[],
        }
    }

    /// Typer: lives remaining.
    pub fn lives(&self) -> Option<u32> {
        match &self.variant {
            VariantState::Typer { lives, .. } => Some(*lives),
            _ => None,
        }
    }

    /// Typer: ticks left on the current word's clock.
    pub fn ticks_left(&self) -> Option<u32> {
        match &self.variant {
            VariantState::Typer { ticks_left, .. } => Some(*ticks_left),
            _ => None,
        }
    }
}

fn tick_budget(question: Option<&GeneratedQuestion>) -> u32 {
    match question.map(|q| &q.prompt) {
        Some(Prompt::SpeedTyper { ticks, .. }) => *ticks,
        _ => TYPER_TICK_BUDGET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(i: usize, word: &str, prompt: Prompt) -> GeneratedQuestion {
        let correct_answer = match &prompt {
            Prompt::MatchMeaning { meaning } => meaning.clone(),
            Prompt::FlashcardBlitz { .. } => word.to_string(),
            _ => word.to_string(),
        };
        GeneratedQuestion {
            ref_id: format!("s-{i}"),
            word: word.to_string(),
            question_text: word.to_string(),
            correct_answer,
            drill_set_ref_id: format!("e-{i}"),
            drill_challenge_ref_id: "chal-1".into(),
            prompt,
        }
    }

    fn quiz(words: &[(&str, &[&str])]) -> Session {
        let questions = words
            .iter()
            .enumerate()
            .map(|(i, (word, options))| {
                question(
                    i,
                    word,
                    Prompt::ContextQuiz {
                        sentence: format!("{} goes here.", crate::generator::BLANK),
                        options: options.iter().map(|o| o.to_string()).collect(),
                    },
                )
            })
            .collect();
        Session::new("chal-1", ChallengeKind::ContextMaster, questions)
    }

    fn matching(words: &[(&str, &str)]) -> Session {
        let questions = words
            .iter()
            .enumerate()
            .map(|(i, (word, meaning))| {
                question(
                    i,
                    word,
                    Prompt::MatchMeaning {
                        meaning: meaning.to_string(),
                    },
                )
            })
            .collect();
        Session::new("chal-1", ChallengeKind::MatchMeaning, questions)
    }

    fn submit_count(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| **e == Effect::SubmitResults)
            .count()
    }

    #[test]
    fn quiz_full_playthrough_submits_once() {
        let mut session = quiz(&[
            ("lucid", &["lucid", "placid", "candid", "astute"]),
            ("placid", &["frugal", "placid", "zealous", "lucid"]),
            ("candid", &["candid", "taciturn", "astute", "placid"]),
        ]);
        let mut submits = 0;

        for expected in [0usize, 1, 0] {
            let effects = session.apply(SessionEvent::OptionChosen(expected));
            assert_eq!(effects, vec![Effect::ScheduleAdvance(QUIZ_ADVANCE_DELAY)]);
            let effects = session.apply(SessionEvent::AdvanceFired);
            submits += submit_count(&effects);
        }

        assert!(session.is_completed());
        assert_eq!(submits, 1);
        assert_eq!(session.score(), 3);
        assert_eq!(session.answers().len(), 3);
        assert!(session.answers().iter().all(|a| a.is_correct));
    }

    #[test]
    fn quiz_second_click_is_ignored_until_advance() {
        let mut session = quiz(&[
            ("lucid", &["lucid", "placid"]),
            ("placid", &["placid", "lucid"]),
        ]);
        session.apply(SessionEvent::OptionChosen(0));
        assert_eq!(session.answers().len(), 1);

        // Clicks during the reveal window change nothing.
        let effects = session.apply(SessionEvent::OptionChosen(1));
        assert!(effects.is_empty());
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn quiz_score_equals_correct_count_at_every_step() {
        let mut session = quiz(&[
            ("lucid", &["lucid", "placid"]),
            ("placid", &["lucid", "placid"]),
            ("candid", &["candid", "lucid"]),
        ]);
        // Correct, wrong, correct.
        for (choice, expected_score) in [(0usize, 1u32), (0, 1), (0, 2)] {
            session.apply(SessionEvent::OptionChosen(choice));
            let correct_count = session.answers().iter().filter(|a| a.is_correct).count() as u32;
            assert_eq!(session.score(), correct_count);
            assert_eq!(session.score(), expected_score);
            session.apply(SessionEvent::AdvanceFired);
        }
        assert!(session.is_completed());
    }

    #[test]
    fn advance_without_answer_is_a_noop() {
        let mut session = quiz(&[("lucid", &["lucid", "placid"])]);
        let effects = session.apply(SessionEvent::AdvanceFired);
        assert!(effects.is_empty());
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_completed());
    }

    #[test]
    fn quiz_out_of_range_option_is_ignored() {
        let mut session = quiz(&[("lucid", &["lucid", "placid"])]);
        let effects = session.apply(SessionEvent::OptionChosen(9));
        assert!(effects.is_empty());
        assert_eq!(session.answers().len(), 0);
    }

    fn scramble_session(word: &str, letters: &str) -> Session {
        let questions = vec![question(
            0,
            word,
            Prompt::WordScramble {
                letters: letters.chars().collect(),
            },
        )];
        Session::new("chal-1", ChallengeKind::WordScramble, questions)
    }

    #[test]
    fn scramble_wrong_assembly_retries_without_penalty() {
        // Letters presented as "cta", target "cat".
        let mut session = scramble_session("cat", "cta");
        // "cta" assembled in presented order: wrong.
        session.apply(SessionEvent::LetterPicked(0));
        session.apply(SessionEvent::LetterPicked(1));
        let effects = session.apply(SessionEvent::LetterPicked(2));
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Notify(n) if n.severity == crate::model::Severity::Info));
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.assembled(), "");
        assert!(session.answers().is_empty());

        // "cat" via indices 0, 2, 1: correct.
        session.apply(SessionEvent::LetterPicked(0));
        session.apply(SessionEvent::LetterPicked(2));
        let effects = session.apply(SessionEvent::LetterPicked(1));
        assert_eq!(
            effects,
            vec![Effect::ScheduleAdvance(SCRAMBLE_ADVANCE_DELAY)]
        );
        assert_eq!(session.answers().len(), 1);
        assert!(session.answers()[0].is_correct);
        assert_eq!(session.answers()[0].user_response.as_deref(), Some("cat"));
    }

    #[test]
    fn scramble_duplicate_pick_is_ignored() {
        let mut session = scramble_session("cat", "cta");
        session.apply(SessionEvent::LetterPicked(0));
        session.apply(SessionEvent::LetterPicked(0));
        assert_eq!(session.assembled(), "c");
    }

    #[test]
    fn scramble_skip_resolves_incorrect() {
        let mut session = scramble_session("cat", "cta");
        session.apply(SessionEvent::LetterPicked(0));
        let effects = session.apply(SessionEvent::ScrambleSkipped);
        assert_eq!(
            effects,
            vec![Effect::ScheduleAdvance(SCRAMBLE_ADVANCE_DELAY)]
        );
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answers()[0].is_correct);
        assert!(session.answers()[0].user_response.is_none());

        let effects = session.apply(SessionEvent::AdvanceFired);
        assert_eq!(submit_count(&effects), 1);
        assert!(session.is_completed());
    }

    #[test]
    fn matching_wrong_guess_is_permanent() {
        let mut session = matching(&[
            ("lucid", "easy to understand"),
            ("frugal", "sparing with money"),
            ("placid", "calm and peaceful"),
        ]);

        // Wrong first guess on word 0.
        session.apply(SessionEvent::WordChosen(0));
        session.apply(SessionEvent::MeaningChosen(1));
        let (matched, incorrect) = session.matching_state().unwrap();
        assert!(!matched.contains(&0));
        assert!(incorrect.contains(&0));
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answers()[0].is_correct);

        // Word 0 is done; selecting it again is a no-op, so a follow-up
        // "right" match cannot rescue it.
        session.apply(SessionEvent::WordChosen(0));
        assert_eq!(session.selected_word(), None);
        let effects = session.apply(SessionEvent::MeaningChosen(0));
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Notify(n) if n.severity == crate::model::Severity::Warning));
        let (matched, incorrect) = session.matching_state().unwrap();
        assert!(!matched.contains(&0));
        assert!(incorrect.contains(&0));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn matching_meaning_without_word_warns() {
        let mut session = matching(&[("lucid", "easy to understand")]);
        let effects = session.apply(SessionEvent::MeaningChosen(0));
        assert!(
            matches!(&effects[0], Effect::Notify(n) if n.message.contains("Select a word"))
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn matching_completes_when_every_word_resolves() {
        let mut session = matching(&[
            ("lucid", "easy to understand"),
            ("frugal", "sparing with money"),
            ("placid", "calm and peaceful"),
        ]);
        let mut submits = 0;

        // Word 0 wrong, words 1 and 2 right.
        session.apply(SessionEvent::WordChosen(0));
        submits += submit_count(&session.apply(SessionEvent::MeaningChosen(2)));
        session.apply(SessionEvent::WordChosen(1));
        submits += submit_count(&session.apply(SessionEvent::MeaningChosen(1)));
        session.apply(SessionEvent::WordChosen(2));
        submits += submit_count(&session.apply(SessionEvent::MeaningChosen(2)));

        assert!(session.is_completed());
        assert_eq!(submits, 1);
        assert_eq!(session.answers().len(), 3);
        assert_eq!(session.score(), 2);

        // Terminal: nothing moves any more.
        assert!(session.apply(SessionEvent::WordChosen(1)).is_empty());
        assert!(session.apply(SessionEvent::MeaningChosen(0)).is_empty());
        assert_eq!(session.answers().len(), 3);
    }

    fn typer_session(words: &[&str]) -> Session {
        let questions = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                question(
                    i,
                    word,
                    Prompt::SpeedTyper {
                        display: word.to_string(),
                        ticks: 2,
                    },
                )
            })
            .collect();
        Session::new("chal-1", ChallengeKind::SpeedTyper, questions)
    }

    #[test]
    fn typer_correct_answer_advances() {
        let mut session = typer_session(&["lucid", "frugal"]);
        let effects = session.apply(SessionEvent::WordTyped("Lucid".into()));
        assert_eq!(effects, vec![Effect::ScheduleAdvance(TYPER_ADVANCE_DELAY)]);
        assert_eq!(session.score(), 1);
        session.apply(SessionEvent::AdvanceFired);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.ticks_left(), Some(2));
    }

    #[test]
    fn typer_timeout_costs_a_life() {
        let mut session = typer_session(&["lucid", "frugal"]);
        session.apply(SessionEvent::Tick);
        assert_eq!(session.ticks_left(), Some(1));
        let effects = session.apply(SessionEvent::Tick);
        assert!(effects.contains(&Effect::ScheduleAdvance(TYPER_ADVANCE_DELAY)));
        assert_eq!(session.lives(), Some(TYPER_LIVES - 1));
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answers()[0].is_correct);
    }

    #[test]
    fn typer_out_of_lives_fails_terminally_and_fills_queue() {
        let mut session = typer_session(&["lucid", "frugal", "placid", "candid", "astute"]);
        let mut submits = 0;
        for _ in 0..TYPER_LIVES {
            submits += submit_count(&session.apply(SessionEvent::WordTyped("wrong".into())));
            session.apply(SessionEvent::AdvanceFired);
        }
        assert!(session.is_completed());
        assert_eq!(submits, 1);
        // All five placeholder rows get a result even though play stopped
        // after the third miss.
        assert_eq!(session.answers().len(), 5);
        assert_eq!(session.score(), 0);
        assert!(session.answers()[3].user_response.is_none());
    }

    fn blitz_session(words: &[(&str, u32)]) -> Session {
        let questions = words
            .iter()
            .enumerate()
            .map(|(i, (word, speed))| {
                question(
                    i,
                    word,
                    Prompt::FlashcardBlitz {
                        meaning: format!("meaning of {word}"),
                        column: 0,
                        speed: *speed,
                    },
                )
            })
            .collect();
        Session::new("chal-1", ChallengeKind::FlashcardBlitz, questions)
    }

    #[test]
    fn blitz_card_on_the_floor_is_missed() {
        let mut session = blitz_session(&[("lucid", BLITZ_FLOOR)]);
        assert_eq!(
            session.initial_effects(),
            vec![Effect::ScheduleTick(BLITZ_TICK_INTERVAL)]
        );
        let effects = session.apply(SessionEvent::Tick);
        assert_eq!(submit_count(&effects), 1);
        assert!(session.is_completed());
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answers()[0].is_correct);
    }

    #[test]
    fn blitz_typed_word_catches_the_card() {
        let mut session = blitz_session(&[("lucid", 1), ("frugal", 1)]);
        session.apply(SessionEvent::Tick);
        let effects = session.apply(SessionEvent::WordTyped("lucid".into()));
        assert!(effects.is_empty());
        assert_eq!(session.score(), 1);

        // Second card activates on the next even tick, then gets caught.
        session.apply(SessionEvent::Tick);
        let effects = session.apply(SessionEvent::WordTyped("frugal".into()));
        assert_eq!(submit_count(&effects), 1);
        assert!(session.is_completed());
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn blitz_typed_word_with_no_matching_card_is_ignored() {
        let mut session = blitz_session(&[("lucid", 1), ("frugal", 1)]);
        // "frugal" has not spawned yet, so typing it does nothing.
        let effects = session.apply(SessionEvent::WordTyped("frugal".into()));
        assert!(effects.is_empty());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn completed_session_ignores_all_events() {
        let mut session = quiz(&[("lucid", &["lucid", "placid"])]);
        session.apply(SessionEvent::OptionChosen(0));
        let effects = session.apply(SessionEvent::AdvanceFired);
        assert_eq!(submit_count(&effects), 1);
        assert!(session.is_completed());

        for event in [
            SessionEvent::OptionChosen(0),
            SessionEvent::AdvanceFired,
            SessionEvent::Tick,
            SessionEvent::WordTyped("lucid".into()),
        ] {
            assert!(session.apply(event).is_empty());
        }
        assert_eq!(session.answers().len(), 1);
    }
}
