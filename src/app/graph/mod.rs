mod build;
mod interaction;
mod view;

pub(in crate::app) use build::build_sim_graph;
pub(in crate::app) use interaction::Gesture;
