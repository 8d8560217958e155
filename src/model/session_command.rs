use super::Level;

/// Requests from the presentation layer. `I` is the game's input payload: a number for
/// Number Rush, an answer slot for Color Blast, a card index for Memory Match.
#[derive(Debug, Clone)]
pub enum SessionCommand<I> {
    Start { names: Vec<String>, level: Level },
    AdvanceTurn,
    Input(I),
    RestartRound,
    AdvanceLevel,
    Finish,
    Abandon,
}
