// Workforce sizing: how many inspectors of each grade to hire so that at
// least `PecasInspecionadasMin` good pieces are inspected per shift, at the
// lowest wage-plus-error cost.

use crate::domain::{error::Result, LinearExpr, Model, OptimizationType, VariableDomain};

pub fn build_model() -> Result<Model> {
    let mut model = Model::new("inspetores");

    model.add_set("INSPETORES", ["I", "II"])?;

    model.add_scalar_parameter("PecasInspecionadasMin", 1800.0)?;
    model.add_scalar_parameter("HorasExpediente", 8.0)?;
    model.add_parameter("TaxaDeInspecao", &["INSPETORES"], [("I", 25.0), ("II", 15.0)])?;
    model.add_parameter(
        "TaxaDeConfiabilidade",
        &["INSPETORES"],
        [("I", 0.98), ("II", 0.95)],
    )?;
    model.add_parameter("CustoHora", &["INSPETORES"], [("I", 4.0), ("II", 3.0)])?;
    model.add_scalar_parameter("CustoErro", 2.0)?;
    model.add_parameter(
        "DisponibilidadeInspetores",
        &["INSPETORES"],
        [("I", 8.0), ("II", 10.0)],
    )?;

    model.declare_variable("contratacao", &["INSPETORES"], VariableDomain::NonNegativeIntegers)?;

    model.add_constraint("atendimento_demandas", &[], |m, _| {
        Ok(inspected_pieces(m)?.geq(m.param("PecasInspecionadasMin")?.value()?))
    })?;

    model.add_constraint("disponibilidade_inspetores", &["INSPETORES"], |m, key| {
        Ok(m.var("contratacao")?
            .expr(key)?
            .leq(m.param("DisponibilidadeInspetores")?.get(key)?))
    })?;

    model.set_objective_by_rule(OptimizationType::Minimize, |m| {
        let contratacao = m.var("contratacao")?;
        let wages = m
            .set("INSPETORES")?
            .keys()
            .map(|i| Ok(contratacao.expr(i)? * m.param("CustoHora")?.get(i)?))
            .sum::<Result<LinearExpr>>()?;
        let errors = m
            .set("INSPETORES")?
            .keys()
            .map(|i| {
                Ok(contratacao.expr(i)?
                    * m.param("TaxaDeInspecao")?.get(i)?
                    * m.param("TaxaDeConfiabilidade")?.get(i)?
                    * m.param("CustoErro")?.value()?)
            })
            .sum::<Result<LinearExpr>>()?;
        Ok(wages + errors)
    })?;

    Ok(model)
}

/// `Σ contratacao[i]·TaxaDeInspecao[i]·TaxaDeConfiabilidade[i]·HorasExpediente`
pub fn inspected_pieces(m: &Model) -> Result<LinearExpr> {
    let contratacao = m.var("contratacao")?;
    let hours = m.param("HorasExpediente")?.value()?;
    m.set("INSPETORES")?
        .keys()
        .map(|i| {
            Ok(contratacao.expr(i)?
                * m.param("TaxaDeInspecao")?.get(i)?
                * m.param("TaxaDeConfiabilidade")?.get(i)?
                * hours)
        })
        .sum()
}
