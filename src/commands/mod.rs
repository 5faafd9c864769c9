pub mod renumber;
