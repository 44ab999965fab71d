pub mod gpg_process;
