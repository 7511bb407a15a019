pub mod validator_server;
