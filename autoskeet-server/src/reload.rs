//! Settings reload trigger. SIGHUP on Unix; never fires elsewhere.

#[cfg(unix)]
pub struct ReloadSignal {
    inner: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ReloadSignal {
    pub fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            inner: signal(SignalKind::hangup())?,
        })
    }

    pub async fn recv(&mut self) {
        if self.inner.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
pub struct ReloadSignal;

#[cfg(not(unix))]
impl ReloadSignal {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}
