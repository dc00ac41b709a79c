pub mod export_sink;
