//! Win/loss statistics over confirmed matches.

use std::cmp::Ordering;

use uuid::Uuid;

use super::enums::{Lane, Side, Team};

const TOP_CHAMPIONS: usize = 10;
const UNKNOWN_CHAMPION: &str = "Unknown";

/// One friend's line in one confirmed match.
#[derive(Debug, Clone, PartialEq)]
pub struct Participation {
    pub match_id: Uuid,
    pub friend_id: Uuid,
    pub team: Team,
    pub lane: Lane,
    pub champion: Option<String>,
    pub winner_side: Side,
    pub team_a_side: Side,
}

impl From<infra::models::ConfirmedMatchMemberRow> for Participation {
    fn from(row: infra::models::ConfirmedMatchMemberRow) -> Self {
        Self {
            match_id: row.match_id,
            friend_id: row.friend_id,
            team: row.team.into(),
            lane: row.lane.into(),
            champion: row.champion,
            winner_side: row.winner_side.into(),
            team_a_side: row.team_a_side.into(),
        }
    }
}

impl Participation {
    pub fn won(&self) -> bool {
        member_won(self.team, self.winner_side, self.team_a_side)
    }
}

/// Team A won when the winning side is the side team A played on.
pub fn member_won(team: Team, winner_side: Side, team_a_side: Side) -> bool {
    let team_a_won = winner_side == team_a_side;
    match team {
        Team::A => team_a_won,
        Team::B => !team_a_won,
    }
}

/// Rounds to three decimals.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn win_rate(wins: u32, games: u32) -> Option<f64> {
    (games > 0).then(|| round3(f64::from(wins) / f64::from(games)))
}

/// Insertion-ordered tally, so ties resolve to the first value seen.
#[derive(Debug)]
struct Tally<K> {
    entries: Vec<(K, u32)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> Tally<K> {
    fn add(&mut self, key: K) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }
}

fn top_lane(lanes: &Tally<Lane>) -> Option<Lane> {
    let mut best: Option<(Lane, u32)> = None;
    for (lane, count) in &lanes.entries {
        if *lane == Lane::Unknown {
            continue;
        }
        if best.is_none_or(|(_, max)| *count > max) {
            best = Some((*lane, *count));
        }
    }
    best.map(|(lane, _)| lane)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FriendSummary {
    pub friend_id: Uuid,
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    pub total_matches: u32,
    pub win_rate: Option<f64>,
    pub top_lane: Option<Lane>,
}

pub fn summarize(
    friend_id: Uuid,
    display_name: &str,
    participations: &[Participation],
) -> FriendSummary {
    let mut wins = 0;
    let mut losses = 0;
    let mut lanes = Tally::default();

    for p in participations.iter().filter(|p| p.friend_id == friend_id) {
        if p.won() {
            wins += 1;
        } else {
            losses += 1;
        }
        lanes.add(p.lane);
    }

    let total_matches = wins + losses;
    FriendSummary {
        friend_id,
        display_name: display_name.to_string(),
        wins,
        losses,
        total_matches,
        win_rate: win_rate(wins, total_matches),
        top_lane: top_lane(&lanes),
    }
}

/// Best win rate first (no matches last), then most matches, then name
/// (case-insensitive, exact bytes breaking ties).
pub fn sort_overview(friends: &mut [FriendSummary]) {
    friends.sort_by(|a, b| {
        let ar = a.win_rate.unwrap_or(-1.0);
        let br = b.win_rate.unwrap_or(-1.0);
        br.partial_cmp(&ar)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_matches.cmp(&a.total_matches))
            .then_with(|| compare_names(&a.display_name, &b.display_name))
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneCount {
    pub lane: Lane,
    pub play_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionStats {
    pub champion: String,
    pub wins: u32,
    pub games: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSummary {
    pub win_rate: Option<f64>,
    pub total_matches: u32,
    pub top_lane: Option<Lane>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FriendDetail {
    pub summary: DetailSummary,
    pub lane_distribution: Vec<LaneCount>,
    pub top_champions: Vec<ChampionStats>,
}

pub fn detail(friend_id: Uuid, participations: &[Participation]) -> FriendDetail {
    let mut wins = 0;
    let mut losses = 0;
    let mut lanes = Tally::default();
    // (champion, wins, games), in first-played order
    let mut champions: Vec<(String, u32, u32)> = Vec::new();

    for p in participations.iter().filter(|p| p.friend_id == friend_id) {
        let won = p.won();
        if won {
            wins += 1;
        } else {
            losses += 1;
        }
        lanes.add(p.lane);

        let name = p.champion.as_deref().unwrap_or(UNKNOWN_CHAMPION);
        match champions.iter_mut().find(|(c, _, _)| c == name) {
            Some((_, w, games)) => {
                *w += u32::from(won);
                *games += 1;
            }
            None => champions.push((name.to_string(), u32::from(won), 1)),
        }
    }

    let total_matches = wins + losses;

    let mut lane_distribution: Vec<LaneCount> = lanes
        .entries
        .iter()
        .filter(|(lane, _)| *lane != Lane::Unknown)
        .map(|(lane, count)| LaneCount {
            lane: *lane,
            play_count: *count,
        })
        .collect();
    lane_distribution.sort_by(|a, b| b.play_count.cmp(&a.play_count));

    champions.sort_by(|a, b| b.2.cmp(&a.2));
    let top_champions = champions
        .into_iter()
        .take(TOP_CHAMPIONS)
        .map(|(champion, wins, games)| ChampionStats {
            champion,
            wins,
            games,
            win_rate: win_rate(wins, games).unwrap_or(0.0),
        })
        .collect();

    FriendDetail {
        summary: DetailSummary {
            win_rate: win_rate(wins, total_matches),
            total_matches,
            top_lane: top_lane(&lanes),
        },
        lane_distribution,
        top_champions,
    }
}
