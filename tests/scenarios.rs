use letsmodel::{
    scenarios, ConstraintType, ExtractedSolution, LinearExpr, Model, MicroLpSolver, ResultExtractor,
    SolutionStatus, SolverService,
};

const TOLERANCE: f64 = 1e-6;

fn solve(model: &Model) -> ExtractedSolution {
    let result = MicroLpSolver::new().solve(model).unwrap();
    assert_eq!(result.status, SolutionStatus::Optimal, "{}", result.message);
    assert!(result.quality.max_constraint_violation < TOLERANCE);
    ResultExtractor::extract(model, &result).unwrap()
}

#[test]
fn inspection_hires_enough_inspectors_at_least_cost() {
    let model = scenarios::inspection::build_model().unwrap();
    let solution = solve(&model);

    let hired_i = solution.value("contratacao", "I").unwrap();
    let hired_ii = solution.value("contratacao", "II").unwrap();
    assert!(hired_i <= 8.0 && hired_ii <= 10.0);
    assert_eq!(hired_i.fract(), 0.0);
    assert_eq!(hired_ii.fract(), 0.0);

    let pieces = solution.evaluate(&scenarios::inspection::inspected_pieces(&model).unwrap());
    assert!(pieces >= 1800.0 - TOLERANCE);
    let activity = solution
        .constraint_activity(&model, "atendimento_demandas")
        .unwrap();
    assert!((activity - pieces).abs() < TOLERANCE);

    // Σ hiring_cost[i]·contratacao[i] + Σ rate[i]·reliability[i]·contratacao[i]·error_cost
    let expected = 4.0 * hired_i + 3.0 * hired_ii + 25.0 * 0.98 * hired_i * 2.0 + 15.0 * 0.95 * hired_ii * 2.0;
    assert!((solution.objective_value - expected).abs() < TOLERANCE);

    // 4 grade-I and 9 grade-II inspectors is the cheapest integer plan
    assert!((solution.objective_value - 495.5).abs() < TOLERANCE);
}

#[test]
fn transportation_meets_demand_exactly_within_capacity() {
    let model = scenarios::transportation::build_model().unwrap();
    let solution = solve(&model);

    let demand = model.param("Demanda").unwrap();
    for (key, required) in demand.iter() {
        let shipped: f64 = model
            .set("FABRICAS")
            .unwrap()
            .keys()
            .map(|fabrica| solution.value("x", (fabrica, &key[0])).unwrap())
            .sum();
        assert!((shipped - required).abs() < TOLERANCE, "demand of {key}");
    }

    let demand_rows = model.constraint_family("atendimento_demandas").unwrap();
    assert_eq!(demand_rows.len(), 5);
    assert!(demand_rows
        .iter()
        .all(|c| c.constraint_type == ConstraintType::Equal));

    let capacity = model.param("ProducaoMaxima").unwrap();
    for (key, limit) in capacity.iter() {
        let shipped: f64 = model
            .set("REVENDAS")
            .unwrap()
            .keys()
            .map(|revenda| solution.value("x", (&key[0], revenda)).unwrap())
            .sum();
        assert!(shipped <= limit + TOLERANCE, "capacity of {key}");
    }
}

#[test]
fn production_raw_material_stock_is_defined_by_equality() {
    let model = scenarios::production::build_model().unwrap();
    let solution = solve(&model);

    let used_month_1 = 10.0 * solution.value("producao", ("A", 1)).unwrap()
        + 7.0 * solution.value("producao", ("B", 1)).unwrap();
    let stock = solution.scalar("estoque_materia_prima").unwrap();
    assert!((stock - (6000.0 - used_month_1)).abs() < TOLERANCE);

    for (product, demand) in [("A", 500.0), ("B", 700.0)] {
        let produced = solution.value("producao", (product, 1)).unwrap()
            + solution.value("producao", (product, 2)).unwrap();
        assert!((produced - demand).abs() < TOLERANCE);
    }

    // Holding finished goods only costs money
    assert_eq!(solution.value("estoques_produto", "A").unwrap(), 0.0);
    assert_eq!(solution.value("estoques_produto", "B").unwrap(), 0.0);
}

#[test]
fn independent_builds_are_identical() {
    for build in [
        scenarios::inspection::build_model,
        scenarios::transportation::build_model,
        scenarios::production::build_model,
    ] {
        let first = build().unwrap();
        let second = build().unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.columns(), second.columns());
        assert_eq!(layout(&first), layout(&second));
    }
}

/// Constraint rows and objective by column position, independent of model identity.
fn layout(model: &Model) -> Vec<(String, ConstraintType, f64, Vec<(usize, f64)>)> {
    let terms = |expr: &LinearExpr| -> Vec<(usize, f64)> { expr.terms().map(|(var, coeff)| (var.column(), coeff)).collect() };
    let mut rows: Vec<_> = model
        .constraints()
        .iter()
        .map(|c| (c.name.clone(), c.constraint_type, c.bound, terms(&c.expression)))
        .collect();
    let objective = model.objective().unwrap();
    rows.push((
        objective.optimization_type.to_string(),
        ConstraintType::Equal,
        objective.expression.constant_term(),
        terms(&objective.expression),
    ));
    rows
}
