// Business models built on the engine, one per module

pub mod inspection;
pub mod production;
pub mod transportation;
