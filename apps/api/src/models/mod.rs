pub mod visited;
