//! Cross product of candidate selections, feasibility filter and ranking

pub mod batch;
pub mod budget;
pub mod combination;

pub use batch::{run_batch, BatchOutcome, BatchScenario, VoiceMode};
pub use budget::BudgetInput;
pub use combination::Combination;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::combos::{build_avatar_selections, build_voice_selections, VoiceSelection};
use crate::error::PlannerError;
use crate::pricing::CostCalculator;

/// Result of one planning run
#[derive(Debug, Clone)]
pub struct Calculation {
    /// Feasible combinations, best first
    pub combinations: Vec<Combination>,
    /// Combinations costed before the feasibility filter
    pub evaluated: usize,
}

/// Ranked feasible combinations for a request
///
/// An empty result means no configuration carries the workload; it is not an error.
pub fn calculate_combinations(catalog: &Catalog, input: &BudgetInput) -> Result<Vec<Combination>, PlannerError> {
    evaluate_combinations(catalog, input).map(|calculation| calculation.combinations)
}

pub fn evaluate_combinations(catalog: &Catalog, input: &BudgetInput) -> Result<Calculation, PlannerError> {
    input.validate()?;

    let calculator = CostCalculator::new(catalog.economics);
    let workload = input.workload();

    let avatars = build_avatar_selections(catalog, &calculator, &workload);
    let voice_selections = if input.use_voice_agent {
        build_voice_selections(catalog, &calculator, &workload)
    } else {
        Vec::new()
    };
    // Without a voice agent every avatar pairs with the inbuilt voice once
    let voices: Vec<Option<&VoiceSelection>> = if input.use_voice_agent {
        voice_selections.iter().map(Some).collect()
    } else {
        vec![None]
    };
    debug!(
        avatars = avatars.len(),
        voices = voices.len(),
        hosting = catalog.hosting_options.len(),
        "Candidate selections built"
    );

    let mut combinations = Vec::with_capacity(avatars.len() * catalog.hosting_options.len() * voices.len());
    for avatar in &avatars {
        for hosting in &catalog.hosting_options {
            for voice in &voices {
                combinations.push(Combination::evaluate(avatar, *voice, hosting, input, &calculator));
            }
        }
    }

    let evaluated = combinations.len();
    combinations.retain(|combination| combination.is_feasible(input));
    combinations.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

    info!(
        evaluated = evaluated,
        feasible = combinations.len(),
        use_voice_agent = input.use_voice_agent,
        "Combinations calculated"
    );

    Ok(Calculation {
        combinations,
        evaluated,
    })
}
