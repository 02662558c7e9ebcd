use letsmodel::{scenarios, Model, ModelError, SolvePipeline};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let builders: [(&str, fn() -> Result<Model, ModelError>); 3] = [
        ("Inspetores", scenarios::inspection::build_model),
        ("Produção e distribuição", scenarios::transportation::build_model),
        ("Planejamento de estoque", scenarios::production::build_model),
    ];

    let pipeline = SolvePipeline::new();
    for (title, build) in builders {
        let model = build()?;
        let outcome = pipeline.run(&model)?;

        println!("\n=== {} ({}) ===", title, outcome.solver);
        println!("Status: {}", outcome.status());

        let Some(solution) = outcome.solution else {
            println!("{}", outcome.result.message);
            continue;
        };

        println!("Custo total: {:.2}", solution.objective_value);
        for (variable, values) in solution.variables() {
            for (key, value) in values {
                if *value != 0.0 {
                    println!("  {}: {}", key.qualify(variable), value);
                }
            }
        }
    }

    Ok(())
}
