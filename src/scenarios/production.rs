// Two-month production and stock planning for products A and B under labor
// and raw-material limits. Raw material left over after month 1 carries into
// month 2 through the auxiliary variable `estoque_materia_prima`, defined by
// an equality constraint.

use crate::domain::{error::Result, LinearExpr, Model, OptimizationType, VariableDomain};

pub fn build_model() -> Result<Model> {
    let mut model = Model::new("planejamento_estoque");

    model.add_set("PRODUTOS", ["A", "B"])?;
    model.add_set("MESES", [1, 2])?;

    model.add_parameter("Demanda", &["PRODUTOS"], [("A", 500.0), ("B", 700.0)])?;
    model.add_parameter(
        "CustoProducao",
        &["PRODUTOS", "MESES"],
        [
            (("A", 1), 52.0),
            (("A", 2), 23.0),
            (("B", 1), 100.0),
            (("B", 2), 60.0),
        ],
    )?;
    model.add_parameter("CustoEstoqueProduto", &["PRODUTOS"], [("A", 0.10), ("B", 0.20)])?;
    model.add_scalar_parameter("CustoEstoqueMateriaPrima", 0.01)?;
    model.add_parameter("CustoMaoDeObra", &["PRODUTOS"], [("A", 0.5), ("B", 0.8)])?;
    model.add_parameter("CustoMateriaPrima", &["PRODUTOS"], [("A", 10.0), ("B", 7.0)])?;
    model.add_parameter("DisponibilidadeMaoDeObra", &["MESES"], [(1, 350.0), (2, 500.0)])?;
    model.add_parameter(
        "DisponibilidadeMateriaPrima",
        &["MESES"],
        [(1, 6000.0), (2, 4000.0)],
    )?;

    model.declare_variable("producao", &["PRODUTOS", "MESES"], VariableDomain::NonNegativeIntegers)?;
    model.declare_variable("estoques_produto", &["PRODUTOS"], VariableDomain::NonNegativeIntegers)?;
    model.declare_variable("estoque_materia_prima", &[], VariableDomain::NonNegativeIntegers)?;

    model.add_constraint("atendimento_demandas", &["PRODUTOS"], |m, key| {
        let produto = &key[0];
        let produced = m
            .set("MESES")?
            .keys()
            .map(|mes| m.var("producao")?.expr((produto, mes)))
            .sum::<Result<LinearExpr>>()?;
        Ok(produced.equals(m.param("Demanda")?.get(produto)?))
    })?;

    model.add_constraint("capacidade_mao_de_obra", &["MESES"], |m, key| {
        let mes = &key[0];
        let labor = m
            .set("PRODUTOS")?
            .keys()
            .map(|produto| {
                Ok(m.var("producao")?.expr((produto, mes))?
                    * m.param("CustoMaoDeObra")?.get(produto)?)
            })
            .sum::<Result<LinearExpr>>()?;
        Ok(labor.leq(m.param("DisponibilidadeMaoDeObra")?.get(mes)?))
    })?;

    model.add_constraint("capacidade_materia_prima_mes_1", &[], |m, _| {
        Ok(raw_material_used(m, 1)?.leq(m.param("DisponibilidadeMateriaPrima")?.get(1)?))
    })?;

    model.add_constraint("capacidade_materia_prima_mes_2", &[], |m, _| {
        let available = m.var("estoque_materia_prima")?.expr(())?
            + m.param("DisponibilidadeMateriaPrima")?.get(2)?;
        Ok(raw_material_used(m, 2)?.leq(available))
    })?;

    model.add_constraint("definir_estoque_materia_prima", &[], |m, _| {
        let leftover = m.param("DisponibilidadeMateriaPrima")?.get(1)? - raw_material_used(m, 1)?;
        Ok(m.var("estoque_materia_prima")?.expr(())?.equals(leftover))
    })?;

    model.set_objective_by_rule(OptimizationType::Minimize, |m| {
        let producao = m.var("producao")?;
        let production = m
            .param("CustoProducao")?
            .iter()
            .map(|(key, cost)| Ok(producao.expr(key)? * cost))
            .sum::<Result<LinearExpr>>()?;

        let estoques = m.var("estoques_produto")?;
        let product_stock = m
            .param("CustoEstoqueProduto")?
            .iter()
            .map(|(key, cost)| Ok(estoques.expr(key)? * cost))
            .sum::<Result<LinearExpr>>()?;

        let raw_stock = m.var("estoque_materia_prima")?.expr(())?
            * m.param("CustoEstoqueMateriaPrima")?.value()?;

        Ok(production + product_stock + raw_stock)
    })?;

    Ok(model)
}

/// `Σ CustoMateriaPrima[p]·producao[p, mes]`
pub fn raw_material_used(m: &Model, mes: i64) -> Result<LinearExpr> {
    let producao = m.var("producao")?;
    let cost = m.param("CustoMateriaPrima")?;
    m.set("PRODUTOS")?
        .keys()
        .map(|produto| Ok(producao.expr((produto, mes))? * cost.get(produto)?))
        .sum()
}
