//! The pieces behind `automata-sim`: dataset loading, automaton dumps and
//! result reporting. Argument handling lives in the binary.

pub mod dataset;
pub mod report;
pub mod serialize;
