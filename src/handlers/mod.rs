// Two tiers: public (no session) and protected (session cookie required).

pub mod protected;
pub mod public;
