// Lattice summary
//
// Builds a small uniform lattice, loads it into a primitive library and
// prints per-heading bucket statistics together with the cost of every
// expansion from heading 0.
use log::info;
use ordered_float::NotNan;

use lattice_primitives::config::ParameterSnapshot;
use lattice_primitives::path_planning::lattice::{
    generate_uniform_lattice, PrimitiveGeneratorConfig, PrimitiveLibrary,
};
use lattice_primitives::path_planning::search::{SearchCostModel, SearchInfo, TraversalContext};
use lattice_primitives::path_planning::smoother::SmootherParams;
use lattice_primitives::PlannerResult;

const PARAMETERS: &str = "
planner:
  reverse_penalty: 2.5
  allow_reverse_expansion: true
  smoother:
    max_iterations: 500
";

fn main() -> PlannerResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let snapshot = ParameterSnapshot::from_yaml_str(PARAMETERS)?;
    let mut search_info = SearchInfo::from_snapshot(&snapshot, "planner")?;
    let smoother = SmootherParams::from_snapshot(&snapshot, "planner")?;

    let config = PrimitiveGeneratorConfig {
        number_of_headings: 16,
        ..PrimitiveGeneratorConfig::default()
    };
    let (metadata, primitives) = generate_uniform_lattice(&config);
    let library = PrimitiveLibrary::load_with_options(metadata, primitives, &search_info.load_options())?;
    search_info.adopt_lattice(library.metadata());

    println!(
        "lattice: {} primitives, {} headings, model '{}', min radius {:.3} m",
        library.len(),
        library.number_of_headings(),
        library.metadata().motion_model,
        search_info.minimum_turning_radius
    );
    for heading in 0..library.number_of_headings() {
        let forward = library.forward_primitives(heading).count();
        let total = library.primitives_from(heading).count();
        let angle = library.metadata().heading_angle(heading).unwrap_or(0.0);
        println!(
            "  heading {:2} ({:6.3} rad): {} forward, {} reverse",
            heading,
            angle,
            forward,
            total - forward
        );
    }

    let model = SearchCostModel::new(&search_info);
    let previous = library.primitives_from(0).next();
    let mut cheapest: Option<(NotNan<f64>, u32)> = None;
    for expansion in library.primitives_from(0) {
        let context = TraversalContext::between(previous.as_ref(), &expansion, 0.0);
        let cost = model.cost(expansion.primitive, &context);
        println!(
            "  id {:3} {:?} {:?} -> heading {:2}: cost {:.3}",
            expansion.trajectory_id(),
            expansion.direction,
            expansion.turn_direction(),
            expansion.end_heading,
            cost
        );
        if let Ok(cost) = NotNan::new(cost) {
            if cheapest.map_or(true, |(best, _)| cost < best) {
                cheapest = Some((cost, expansion.trajectory_id()));
            }
        }
    }
    if let Some((cost, id)) = cheapest {
        info!("cheapest expansion from heading 0 is id {} at {:.3}", id, cost.into_inner());
    }

    println!(
        "smoother: tolerance {:e}, {} iterations, w_data {}, w_smooth {}",
        smoother.tolerance(),
        smoother.max_its(),
        smoother.w_data(),
        smoother.w_smooth()
    );
    Ok(())
}
