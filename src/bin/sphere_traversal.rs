// Manifold traversal on the unit sphere
//
// Samples states on the sphere, connects consecutive samples by walking
// along the manifold, and plots the resulting paths seen from above.

use tracing_subscriber::EnvFilter;

use manifold_planning::common::{Constraint, RealVectorBounds, RealVectorState, StateSampler, StateSpace};
use manifold_planning::constraint::{
    ProjectedSpaceConfig, ProjectedStateSpace, ProjectionConfig, SphereConstraint, TraversalOptions,
};
use manifold_planning::spaces::RealVectorStateSpace;
use manifold_planning::utils::{colors, PathStyle, PointStyle, Visualizer};

// Parameters
const DELTA: f64 = 0.05; // traversal step and goal tolerance
const N_SAMPLE: usize = 12; // number of sampled states
const SEED: u64 = 2017;
const OBSTACLE_HALF_WIDTH: f64 = 0.1; // band around the equator on the x > 0 side

const SAVE_PLOT: bool = true;
const SHOW_PLOT: bool = false; // needs an interactive gnuplot terminal

fn is_free(state: &RealVectorState) -> bool {
    !(state[2].abs() < OBSTACLE_HALF_WIDTH && state[0] > 0.0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let ambient = RealVectorStateSpace::new(RealVectorBounds::uniform(3, -1.5, 1.5)?)?;
    let ambient_sampler = ambient.seeded_sampler(SEED);

    let space = ProjectedStateSpace::from_function(
        ambient,
        SphereConstraint::unit(3)?,
        ProjectionConfig::default(),
        ProjectedSpaceConfig { delta: DELTA },
    )?
    .with_validity_checker(is_free);

    tracing::info!(delta = space.delta(), lambda = space.lambda(), "sphere traversal start");

    let mut sampler = space.projected_sampler(ambient_sampler);
    let mut samples = Vec::with_capacity(N_SAMPLE);
    while samples.len() < N_SAMPLE {
        let mut state = space.alloc_state();
        sampler.sample_uniform(&mut state);
        // The sampler does not promise a converged projection
        if space.constraint().is_satisfied(&state) && is_free(&state) {
            samples.push(state);
        }
    }

    let mut vis = Visualizer::new();
    vis.set_title("Manifold traversal on the unit sphere (top view)")
        .set_x_range(-1.2, 1.2)
        .set_y_range(-1.2, 1.2)
        .plot_circle(1.0)
        .plot_states(&samples, &PointStyle::new(colors::SAMPLE, "Samples").with_symbol('x'));

    let mut connected = 0;
    for (i, pair) in samples.windows(2).enumerate() {
        let traversal = space.traverse_manifold(&pair[0], &pair[1], TraversalOptions::with_path());
        tracing::info!(
            edge = i,
            success = traversal.success,
            stop = ?traversal.stop,
            remaining = traversal.distance,
            "edge checked"
        );

        let style = if traversal.success {
            connected += 1;
            PathStyle::new(colors::PATH, &format!("Edge {}", i))
        } else {
            PathStyle::new(colors::GRAY, &format!("Edge {} (partial)", i)).with_line_width(1.0)
        };
        vis.plot_path(&traversal.into_path(), &style);
    }

    vis.plot_start(&samples[0]).plot_goal(&samples[N_SAMPLE - 1]);
    tracing::info!(connected, edges = N_SAMPLE - 1, "sphere traversal done");

    if SAVE_PLOT {
        vis.save_svg("sphere_traversal.svg")?;
    }
    if SHOW_PLOT {
        vis.show()?;
    }

    Ok(())
}
