// Production-distribution: ship goods from three factories to five resellers,
// meeting every reseller's demand exactly without exceeding any factory's
// capacity, at minimum transport cost.

use crate::domain::{error::Result, LinearExpr, Model, OptimizationType, VariableDomain};

const FABRICAS: [&str; 3] = ["São Paulo", "João Pessoa", "Manaus"];
const REVENDAS: [&str; 5] = ["Rio de Janeiro", "Salvador", "Aracaju", "Maceió", "Recife"];

/// Cost per unit shipped, one row per factory in `FABRICAS` order.
const CUSTO_TRANSPORTE: [[f64; 5]; 3] = [
    [1000.0, 2000.0, 3000.0, 3500.0, 4000.0],
    [4000.0, 2000.0, 1500.0, 1200.0, 1000.0],
    [6000.0, 4000.0, 3500.0, 3000.0, 2000.0],
];

pub fn build_model() -> Result<Model> {
    let mut model = Model::new("producao_distribuicao");

    model.add_set("FABRICAS", FABRICAS)?;
    model.add_set("REVENDAS", REVENDAS)?;

    model.add_parameter(
        "Demanda",
        &["REVENDAS"],
        REVENDAS.into_iter().zip([6000.0, 5000.0, 2000.0, 1000.0, 3000.0]),
    )?;
    model.add_parameter(
        "ProducaoMaxima",
        &["FABRICAS"],
        FABRICAS.into_iter().zip([10000.0, 5000.0, 6000.0]),
    )?;
    model.add_parameter(
        "CustoTransporte",
        &["FABRICAS", "REVENDAS"],
        FABRICAS.iter().zip(CUSTO_TRANSPORTE).flat_map(|(&fabrica, row)| {
            REVENDAS
                .iter()
                .zip(row)
                .map(move |(&revenda, cost)| ((fabrica, revenda), cost))
        }),
    )?;

    model.declare_variable("x", &["FABRICAS", "REVENDAS"], VariableDomain::NonNegativeIntegers)?;

    model.add_constraint("atendimento_demandas", &["REVENDAS"], |m, key| {
        let revenda = &key[0];
        let shipped = m
            .set("FABRICAS")?
            .keys()
            .map(|fabrica| m.var("x")?.expr((fabrica, revenda)))
            .sum::<Result<LinearExpr>>()?;
        Ok(shipped.equals(m.param("Demanda")?.get(revenda)?))
    })?;

    model.add_constraint("capacidade_fabricas", &["FABRICAS"], |m, key| {
        let fabrica = &key[0];
        let shipped = m
            .set("REVENDAS")?
            .keys()
            .map(|revenda| m.var("x")?.expr((fabrica, revenda)))
            .sum::<Result<LinearExpr>>()?;
        Ok(shipped.leq(m.param("ProducaoMaxima")?.get(fabrica)?))
    })?;

    model.set_objective_by_rule(OptimizationType::Minimize, |m| {
        let x = m.var("x")?;
        let cost = m.param("CustoTransporte")?;
        cost.iter()
            .map(|(key, c)| Ok(x.expr(key)? * c))
            .sum()
    })?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure() {
        let model = build_model().unwrap();
        assert_eq!(model.num_columns(), 15);
        assert_eq!(model.constraint_family("atendimento_demandas").unwrap().len(), 5);
        assert_eq!(model.constraint_family("capacidade_fabricas").unwrap().len(), 3);
        assert_eq!(
            model.param("CustoTransporte").unwrap().get(("Manaus", "Recife")).unwrap(),
            2000.0
        );
        assert_eq!(model.objective().unwrap().num_terms(), 15);
    }
}
