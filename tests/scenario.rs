// End-to-end round walkthroughs against the public controller API, driven
// with recording test doubles instead of a browser. Native-friendly.

use carrot_rush::round::placement::Lcg;
use carrot_rush::round::{
    FieldBounds, Item, ItemId, ItemKind, Outcome, Phase, RoundConfig, RoundController, RoundView,
    SoundBank, SoundCue,
};

#[derive(Default)]
struct Hud {
    score_shown: Vec<u32>,
    prompts: Vec<String>,
}

impl RoundView for Hud {
    fn clear_field(&mut self) {}
    fn place_item(&mut self, _item: &Item) {}
    fn remove_item(&mut self, _id: ItemId) {}
    fn show_timer(&mut self, _remaining_secs: u32) {}
    fn show_score(&mut self, carrots_left: u32) {
        self.score_shown.push(carrots_left);
    }
    fn show_stop_button(&mut self) {}
    fn hide_button(&mut self) {}
    fn show_hud(&mut self) {}
    fn show_prompt(&mut self, text: &str) {
        self.prompts.push(text.to_string());
    }
}

#[derive(Default)]
struct Cues {
    played: Vec<SoundCue>,
}

impl SoundBank for Cues {
    fn play(&mut self, cue: SoundCue) {
        self.played.push(cue);
    }
    fn stop(&mut self, _cue: SoundCue) {}
}

const BOUNDS: FieldBounds = FieldBounds {
    width: 800.0,
    height: 500.0,
};

fn new_round() -> (RoundController, Hud, Cues) {
    let mut round = RoundController::new(RoundConfig::default());
    let mut hud = Hud::default();
    let mut cues = Cues::default();
    round.start(BOUNDS, &mut Lcg::new(2024), &mut hud, &mut cues);
    (round, hud, cues)
}

fn ids_of(round: &RoundController, kind: ItemKind) -> Vec<ItemId> {
    round
        .items()
        .iter()
        .filter(|it| it.kind == kind)
        .map(|it| it.id)
        .collect()
}

// Classic layout: duration=5s, 5 carrots, 5 bugs. Pulling all 5 carrots within
// the clock wins and the scoreboard ends at 0 remaining.
#[test]
fn five_carrots_within_five_seconds_wins() {
    let (mut round, mut hud, mut cues) = new_round();

    // A couple of seconds pass mid-round.
    round.tick(&mut hud, &mut cues);
    round.tick(&mut hud, &mut cues);
    assert_eq!(round.remaining_secs(), 3);

    for id in ids_of(&round, ItemKind::Carrot) {
        round.field_click(Some(id), &mut hud, &mut cues);
    }

    assert_eq!(round.phase(), Phase::Finished(Outcome::Win));
    assert_eq!(hud.score_shown.last(), Some(&0));
    assert_eq!(hud.prompts.last().map(String::as_str), Some("YOU WON 🎉"));
    assert!(cues.played.contains(&SoundCue::Win));

    // Stray interval fire after the win must not resurrect the round.
    round.tick(&mut hud, &mut cues);
    assert_eq!(round.phase(), Phase::Finished(Outcome::Win));
}

// Clicking one bug at any point loses immediately.
#[test]
fn one_bug_click_loses_at_any_score() {
    let (mut round, mut hud, mut cues) = new_round();

    let carrots = ids_of(&round, ItemKind::Carrot);
    for id in carrots.iter().take(3) {
        round.field_click(Some(*id), &mut hud, &mut cues);
    }
    assert_eq!(round.score(), 3);

    let bug = ids_of(&round, ItemKind::Bug)[0];
    round.field_click(Some(bug), &mut hud, &mut cues);

    assert_eq!(round.phase(), Phase::Finished(Outcome::Lose));
    assert_eq!(hud.prompts.last().map(String::as_str), Some("YOU LOST 💥"));
    assert!(cues.played.contains(&SoundCue::BugPull));
}

#[test]
fn running_out_the_clock_loses() {
    let (mut round, mut hud, mut cues) = new_round();

    for _ in 0..5 {
        round.tick(&mut hud, &mut cues);
    }

    assert_eq!(round.phase(), Phase::Finished(Outcome::Lose));
    assert_eq!(round.remaining_secs(), 0);
}

#[test]
fn replay_after_a_loss_starts_clean() {
    let (mut round, mut hud, mut cues) = new_round();

    let bug = ids_of(&round, ItemKind::Bug)[0];
    round.field_click(Some(bug), &mut hud, &mut cues);
    assert_eq!(round.phase(), Phase::Finished(Outcome::Lose));

    round.start(BOUNDS, &mut Lcg::new(2025), &mut hud, &mut cues);
    assert_eq!(round.phase(), Phase::Running);
    assert_eq!(round.score(), 0);
    assert_eq!(round.remaining_secs(), 5);
    assert_eq!(round.items().len(), 10);
}
