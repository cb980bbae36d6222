//! Popular Vote
//!
//! Tie-breaking ballots cast by the public. A [`VoteCollector`] holds the
//! tally and may be shared with other threads (a web front end, say); a
//! [`BallotWindow`] decides how long the vote stays open and may feed
//! ballots itself.

use serde::Serialize;
use std::collections::HashSet;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// A public ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ballot {
    Yes,
    No,
}

impl FromStr for Ballot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(Ballot::Yes),
            "no" | "n" => Ok(Ballot::No),
            other => Err(format!("not a ballot: {}", other)),
        }
    }
}

/// Result of submitting a ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    Duplicate,
    Closed,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TallySnapshot {
    pub open: bool,
    pub yes: u32,
    pub no: u32,
}

impl TallySnapshot {
    /// Strict majority of yes ballots.
    pub fn passed(&self) -> bool {
        self.yes > self.no
    }
}

pub trait VoteCollector: Send + Sync {
    /// Open the vote, clearing any previous tally and voter list.
    fn open(&self);
    fn close(&self);
    fn record_vote(&self, voter_id: &str, ballot: Ballot) -> RecordOutcome;
    fn snapshot(&self) -> TallySnapshot;
}

#[derive(Debug, Default)]
struct Tally {
    open: bool,
    yes: u32,
    no: u32,
    voters: HashSet<String>,
}

/// Thread-safe ballot box. Each voter id counts once per opening.
#[derive(Debug, Default)]
pub struct VoteBox {
    tally: Mutex<Tally>,
}

impl VoteBox {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteCollector for VoteBox {
    fn open(&self) {
        let mut tally = self.tally.lock().unwrap_or_else(|e| e.into_inner());
        *tally = Tally {
            open: true,
            ..Tally::default()
        };
    }

    fn close(&self) {
        self.tally.lock().unwrap_or_else(|e| e.into_inner()).open = false;
    }

    fn record_vote(&self, voter_id: &str, ballot: Ballot) -> RecordOutcome {
        let voter_id = voter_id.trim();
        if voter_id.is_empty() {
            return RecordOutcome::Invalid;
        }
        let mut tally = self.tally.lock().unwrap_or_else(|e| e.into_inner());
        if !tally.open {
            return RecordOutcome::Closed;
        }
        if !tally.voters.insert(voter_id.to_string()) {
            return RecordOutcome::Duplicate;
        }
        match ballot {
            Ballot::Yes => tally.yes += 1,
            Ballot::No => tally.no += 1,
        }
        RecordOutcome::Recorded
    }

    fn snapshot(&self) -> TallySnapshot {
        let tally = self.tally.lock().unwrap_or_else(|e| e.into_inner());
        TallySnapshot {
            open: tally.open,
            yes: tally.yes,
            no: tally.no,
        }
    }
}

/// Keeps a vote open and returns once it should close.
pub trait BallotWindow {
    fn collect(&mut self, collector: &dyn VoteCollector);
}

/// Reads `yes`/`no` lines until `close`, `done`, `end` or end of input.
/// Every accepted line is a distinct console voter.
pub struct LineBallots<R> {
    reader: R,
    prefix: String,
    voters: u32,
}

impl<R: BufRead> LineBallots<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            prefix: "console".to_string(),
            voters: 0,
        }
    }
}

/// Ballots typed on standard input.
pub type StdinBallots = LineBallots<std::io::StdinLock<'static>>;

impl StdinBallots {
    pub fn stdin() -> Self {
        LineBallots::new(std::io::stdin().lock())
    }
}

impl<R: BufRead> BallotWindow for LineBallots<R> {
    fn collect(&mut self, collector: &dyn VoteCollector) {
        info!("[PopularVote] Type yes/no to vote, or 'close' to end voting.");
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "ballot input failed; closing vote");
                    break;
                }
            }
            let input = line.trim().to_lowercase();
            if matches!(input.as_str(), "close" | "done" | "end") {
                break;
            }
            match input.parse::<Ballot>() {
                Ok(ballot) => {
                    self.voters += 1;
                    let voter = format!("{}-{}", self.prefix, self.voters);
                    if collector.record_vote(&voter, ballot) == RecordOutcome::Recorded {
                        info!("[PopularVote] Recorded {:?} vote.", ballot);
                    }
                }
                Err(_) if input.is_empty() => {}
                Err(_) => info!("[PopularVote] Enter yes/no or close."),
            }
        }
    }
}

/// Record `[voter-id] yes|no` lines into a shared collector until end of
/// input. Lines without a voter id get a numbered console id. Returns how
/// many ballots were recorded; ballots sent while the vote is closed are
/// refused by the collector.
pub fn feed_ballots<R: BufRead>(reader: R, collector: Arc<dyn VoteCollector>) -> u32 {
    let mut recorded = 0;
    let mut anonymous = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "ballot input failed; no more ballots");
                break;
            }
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (voter, ballot) = match parts.as_slice() {
            [] => continue,
            [ballot] => {
                anonymous += 1;
                (format!("console-{}", anonymous), *ballot)
            }
            [voter, ballot] => (voter.to_string(), *ballot),
            _ => {
                info!("[PopularVote] Enter '<voter> yes|no'.");
                continue;
            }
        };
        let Ok(ballot) = ballot.parse::<Ballot>() else {
            info!("[PopularVote] Enter '<voter> yes|no'.");
            continue;
        };
        match collector.record_vote(&voter, ballot) {
            RecordOutcome::Recorded => {
                recorded += 1;
                info!(voter = %voter, "[PopularVote] Recorded {:?} vote.", ballot);
            }
            RecordOutcome::Closed => info!("[PopularVote] Voting is not open."),
            other => info!(voter = %voter, result = ?other, "[PopularVote] Ballot refused."),
        }
    }
    recorded
}

/// Stays open for a fixed duration while other threads record ballots.
#[derive(Debug, Clone, Copy)]
pub struct TimedWindow {
    duration: Duration,
}

impl TimedWindow {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl BallotWindow for TimedWindow {
    fn collect(&mut self, _collector: &dyn VoteCollector) {
        info!(secs = self.duration.as_secs(), "[PopularVote] Open for a fixed window.");
        thread::sleep(self.duration);
    }
}

/// Casts a fixed list of ballots. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBallots {
    ballots: Vec<(String, Ballot)>,
}

impl ScriptedBallots {
    pub fn new(ballots: Vec<(String, Ballot)>) -> Self {
        Self { ballots }
    }

    /// `yes` distinct yes voters followed by `no` distinct no voters.
    pub fn counts(yes: u32, no: u32) -> Self {
        let ballots = (0..yes)
            .map(|i| (format!("yes-{}", i), Ballot::Yes))
            .chain((0..no).map(|i| (format!("no-{}", i), Ballot::No)))
            .collect();
        Self { ballots }
    }
}

impl BallotWindow for ScriptedBallots {
    fn collect(&mut self, collector: &dyn VoteCollector) {
        for (voter, ballot) in &self.ballots {
            collector.record_vote(voter, *ballot);
        }
    }
}

/// A collector paired with the window that governs it.
pub struct PopularVote {
    collector: Arc<dyn VoteCollector>,
    window: Box<dyn BallotWindow>,
}

impl PopularVote {
    pub fn new(collector: Arc<dyn VoteCollector>, window: Box<dyn BallotWindow>) -> Self {
        Self { collector, window }
    }

    pub fn collector(&self) -> Arc<dyn VoteCollector> {
        Arc::clone(&self.collector)
    }

    /// Open, collect, close and report the tally.
    pub fn run(&mut self) -> TallySnapshot {
        self.collector.open();
        info!("[PopularVote] Open.");
        self.window.collect(self.collector.as_ref());
        self.collector.close();
        let snapshot = self.collector.snapshot();
        info!(
            "[PopularVote] Results: YES={}, NO={}.",
            snapshot.yes, snapshot.no
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_vote_box_rules() {
        let vote_box = VoteBox::new();
        assert_eq!(vote_box.record_vote("v1", Ballot::Yes), RecordOutcome::Closed);

        vote_box.open();
        assert_eq!(vote_box.record_vote("v1", Ballot::Yes), RecordOutcome::Recorded);
        assert_eq!(vote_box.record_vote("v1", Ballot::No), RecordOutcome::Duplicate);
        assert_eq!(vote_box.record_vote("  ", Ballot::No), RecordOutcome::Invalid);
        assert_eq!(vote_box.record_vote("v2", Ballot::No), RecordOutcome::Recorded);
        vote_box.close();
        assert_eq!(vote_box.record_vote("v3", Ballot::No), RecordOutcome::Closed);

        let snapshot = vote_box.snapshot();
        assert_eq!(snapshot, TallySnapshot { open: false, yes: 1, no: 1 });
        assert!(!snapshot.passed());
    }

    #[test]
    fn test_reopening_resets_tally() {
        let vote_box = VoteBox::new();
        vote_box.open();
        vote_box.record_vote("v1", Ballot::Yes);
        vote_box.open();
        assert_eq!(vote_box.snapshot().yes, 0);
        assert_eq!(vote_box.record_vote("v1", Ballot::Yes), RecordOutcome::Recorded);
    }

    #[test]
    fn test_concurrent_ballots() {
        let vote_box = Arc::new(VoteBox::new());
        vote_box.open();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let vote_box = Arc::clone(&vote_box);
                thread::spawn(move || {
                    let ballot = if i % 2 == 0 { Ballot::Yes } else { Ballot::No };
                    vote_box.record_vote(&format!("voter-{}", i), ballot)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), RecordOutcome::Recorded);
        }
        let snapshot = vote_box.snapshot();
        assert_eq!((snapshot.yes, snapshot.no), (4, 4));
    }

    #[test]
    fn test_line_ballots_stop_on_close() {
        let input = Cursor::new("yes\nY\nmaybe\n\nno\nclose\nyes\n");
        let mut popular = PopularVote::new(
            Arc::new(VoteBox::new()),
            Box::new(LineBallots::new(input)),
        );
        let snapshot = popular.run();
        assert_eq!((snapshot.yes, snapshot.no), (2, 1));
        assert!(!snapshot.open);
        assert!(snapshot.passed());
    }

    #[test]
    fn test_line_ballots_stop_at_end_of_input() {
        let mut popular = PopularVote::new(
            Arc::new(VoteBox::new()),
            Box::new(LineBallots::new(Cursor::new("no\nno"))),
        );
        assert_eq!(popular.run().no, 2);
    }

    #[test]
    fn test_scripted_ballots() {
        let mut popular = PopularVote::new(
            Arc::new(VoteBox::new()),
            Box::new(ScriptedBallots::counts(3, 2)),
        );
        let snapshot = popular.run();
        assert_eq!((snapshot.yes, snapshot.no), (3, 2));
        assert!(snapshot.passed());
    }

    #[test]
    fn test_timed_window_returns() {
        let mut popular = PopularVote::new(
            Arc::new(VoteBox::new()),
            Box::new(TimedWindow::new(Duration::from_millis(5))),
        );
        assert_eq!(popular.run(), TallySnapshot::default());
    }

    /// Wait until the collector opens, then cast the given ballots.
    fn voter_thread(
        collector: Arc<dyn VoteCollector>,
        ballots: Vec<(&'static str, Ballot)>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            for _ in 0..2000 {
                if collector.snapshot().open {
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
            for (voter, ballot) in ballots {
                collector.record_vote(voter, ballot);
            }
        })
    }

    #[test]
    fn test_timed_window_counts_ballots_from_other_threads() {
        let mut popular = PopularVote::new(
            Arc::new(VoteBox::new()),
            Box::new(TimedWindow::new(Duration::from_millis(300))),
        );
        let voters = voter_thread(
            popular.collector(),
            vec![("a", Ballot::Yes), ("b", Ballot::Yes), ("c", Ballot::No), ("a", Ballot::No)],
        );

        let snapshot = popular.run();
        voters.join().unwrap();
        assert_eq!((snapshot.yes, snapshot.no), (2, 1));
        assert!(snapshot.passed());
        assert_eq!(popular.collector().record_vote("d", Ballot::No), RecordOutcome::Closed);
    }

    #[test]
    fn test_feed_ballots() {
        let vote_box = Arc::new(VoteBox::new());
        vote_box.open();
        let input = Cursor::new("ana yes\nno\nben maybe\nana no\n\ncal no\nyes\n");
        assert_eq!(feed_ballots(input, vote_box.clone()), 4);
        let snapshot = vote_box.snapshot();
        assert_eq!((snapshot.yes, snapshot.no), (2, 2));

        vote_box.close();
        assert_eq!(feed_ballots(Cursor::new("dee yes\n"), vote_box), 0);
    }
}
