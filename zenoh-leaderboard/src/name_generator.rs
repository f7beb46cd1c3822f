/// Name generation for players who did not pick a leaderboard name
use markov_namegen::{CharacterChainGenerator, RandomTextGenerator};

/// Training names: fantasy, mythology and arcade flavoured
const TRAINING_NAMES: &[&str] = &[
    "Aldric", "Theron", "Gareth", "Mirabel", "Isolde", "Lysander", "Elowen", "Rowan",
    "Caelum", "Astrid", "Eirik", "Freya", "Magnus", "Sigrid", "Bjorn", "Ingrid",
    "Apollo", "Diana", "Atlas", "Selene", "Orion", "Luna", "Phoenix", "Aurora",
    "Finn", "Maeve", "Cormac", "Niamh", "Declan", "Brigid", "Ragnar", "Gunnar",
    "Pixel", "Blocky", "Stacker", "Dropper", "Quartz", "Cobalt", "Vector", "Nova",
];

fn create_name_generator() -> CharacterChainGenerator {
    CharacterChainGenerator::builder()
        .with_order(2)
        .with_prior(0.01)
        .train(TRAINING_NAMES.iter().copied())
        .build()
}

/// Generate a pronounceable player name
///
/// Names are 3 to 12 alphanumeric characters, capitalised.
pub fn generate_player_name() -> String {
    let mut generator = create_name_generator();
    loop {
        let name = generator.generate_one();
        let len = name.chars().count();
        if (3..=12).contains(&len) && name.chars().all(|c| c.is_alphanumeric()) {
            return capitalize(&name);
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
