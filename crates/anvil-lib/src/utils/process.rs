/// Extension trait for game process spawning: detaches the child so it
/// outlives the launcher when output is not attached.
pub trait DetachExt {
    /// On Windows, this uses CREATE_NEW_PROCESS_GROUP.
    /// On Unix, this uses a new session via setsid.
    fn detach(&mut self) -> &mut Self;
}

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;

impl DetachExt for tokio::process::Command {
    fn detach(&mut self) -> &mut Self {
        #[cfg(windows)]
        {
            self.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
        }
        #[cfg(unix)]
        {
            unsafe {
                self.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }
        self
    }
}
