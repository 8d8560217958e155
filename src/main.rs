use log::{debug, info};
use mini_arcade::game::{Leaderboard, Settings};
use mini_arcade::model::GameKind;

const SHOWN_ENTRIES: usize = 10;

fn init_logging() {
    env_logger::init();
}

fn print_leaderboard(leaderboard: &Leaderboard, game: GameKind) {
    println!("{}", game);
    let entries = leaderboard.top_scores(game, SHOWN_ENTRIES);
    if entries.is_empty() {
        println!("  No scores yet!");
        return;
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {:<16} {:>6}  level {}  {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            entry.timestamp
        );
    }
}

fn main() {
    init_logging();

    let data_dir = Settings::data_dir();
    let settings = Settings::load(&data_dir);
    if Settings::is_debug_mode() {
        debug!("Settings: {:?}", settings);
    }
    info!("Reading scores from {}", data_dir.display());

    let leaderboard = Leaderboard::open(&data_dir);
    for (i, game) in GameKind::all().into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_leaderboard(&leaderboard, game);
    }
}
