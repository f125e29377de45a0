use anyhow::Error;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub struct Booter {
    pub port: u16,
    tcp_listener: TcpListener,
}

impl Booter {
    pub async fn new(port: u16) -> Result<Self, Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            tcp_listener: listener,
        })
    }

    pub async fn start(self, router: Router) -> Result<(), Error> {
        tracing::info!("Listening on 0.0.0.0:{}", self.port);
        axum::serve(self.tcp_listener, router).await?;
        Ok(())
    }
}
