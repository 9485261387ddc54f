pub mod netsuite;
