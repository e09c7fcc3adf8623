//! Swiss Event Example
//!
//! Runs a small Swiss tournament through the manager, then writes the frontend
//! export. Set `RUST_LOG=info` to follow the engine's logging.

use rand::Rng;
use tournament_engine::{StorageConfig, TournamentConfig, TournamentManager, TournamentResult};

fn main() -> TournamentResult<()> {
    env_logger::init();

    println!("=== Swiss Event Example ===\n");

    let root = std::env::temp_dir().join("tournament_engine_example");
    let mut manager = TournamentManager::new(StorageConfig::rooted(&root))?;

    let players = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace"];
    let id = manager.create_tournament(TournamentConfig::swiss("Friday Night Swiss"), players)?;
    manager.start_tournament(&id)?;

    let mut rng = rand::rng();
    loop {
        let tournament = manager.load_tournament(&id)?;
        if tournament.is_completed() {
            break;
        }
        let round = tournament.current_round();
        let pending: Vec<_> = tournament.pending_matches().into_iter().cloned().collect();

        println!("Round {}", round);
        for m in pending {
            let player_b = m.player_b.clone().unwrap_or_default();
            let (winner, score_a, score_b) = if rng.random_bool(0.5) {
                (m.player_a.clone(), 2, rng.random_range(0..2))
            } else {
                (player_b.clone(), rng.random_range(0..2), 2)
            };
            println!("  {} vs {}: {} wins {}-{}", m.player_a, player_b, winner, score_a, score_b);
            manager.report_match(&id, round, m.match_num, &winner, score_a, score_b)?;
        }
    }

    let tournament = manager.load_tournament(&id)?;
    println!("\nFinal standings:");
    for row in tournament.standings() {
        println!(
            "  {}. {:<6} {:.1} pts (Buchholz {:.1})",
            row.rank, row.player, row.points, row.buchholz
        );
    }
    println!("\nWinner: {}", tournament.winner().unwrap_or("none"));

    let (exported, _) = manager.export_default()?;
    println!(
        "Exported {} tournaments to {}",
        exported,
        manager.config().export_file.display()
    );
    Ok(())
}
