pub mod mcmf;
