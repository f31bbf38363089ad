pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        identity_url: String,
        public_url: String,
        secure_cookies: bool,
    },
}
