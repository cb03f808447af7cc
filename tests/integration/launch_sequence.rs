use anyhow::Result;

use crate::common::{Sandbox, FAILURE_STATUS};

#[test]
fn child_exit_code_is_propagated() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let config = sandbox.write_config(
        "qemu.ini",
        "[QEMU]\nCommand=/bin/sh\nArguments=-c \"exit 42\"\n",
    )?;

    assert_eq!(sandbox.run_with(&config)?, Some(42));
    Ok(())
}

#[test]
fn successful_child_exits_zero() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let config = sandbox.write_config("qemu.ini", "[QEMU]\nCommand=/bin/sh\nArguments=-c true\n")?;

    assert_eq!(sandbox.run_with(&config)?, Some(0));
    Ok(())
}

#[test]
fn positional_fields_reach_the_child_in_order() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let work = sandbox.work_dir();
    let config = sandbox.write_config(
        "qemu.ini",
        &format!(
            "[QEMU]\nCommand=/bin/sh\nStartupPath={}\nBoot=-c \"touch $0$1\"\nMachine=boot-\nDisplay=ok\n",
            work.display()
        ),
    )?;

    assert_eq!(sandbox.run_with(&config)?, Some(0));
    assert!(
        work.join("boot-ok").exists(),
        "child should run in StartupPath with positional arguments"
    );
    Ok(())
}

#[test]
fn escaped_spaces_and_quotes_reach_the_child_unchanged() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let work = sandbox.work_dir();
    let config = sandbox.write_config(
        "qemu.ini",
        &format!(
            "\u{feff}[QEMU]\nCommand=/bin/sh\nStartupPath={}\nArguments='-c' 'touch \"$0\"' my\\ disk.img\n",
            work.display()
        ),
    )?;

    assert_eq!(sandbox.run_with(&config)?, Some(0));
    assert!(
        work.join("my disk.img").exists(),
        "escaped space should stay inside one argument"
    );
    Ok(())
}

#[test]
fn empty_command_exits_with_failure() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let config = sandbox.write_config("qemu.ini", "[QEMU]\nCommand=\nArguments=-c true\n")?;

    assert_eq!(sandbox.run_with(&config)?, Some(FAILURE_STATUS));
    Ok(())
}

#[test]
fn missing_config_file_exits_with_failure() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let config = sandbox.work_dir().join("absent.ini");

    assert_eq!(sandbox.run_with(&config)?, Some(FAILURE_STATUS));
    Ok(())
}

#[test]
fn nonexistent_executable_exits_with_failure() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let missing = sandbox.work_dir().join("qemu-system-none");
    let config = sandbox.write_config(
        "qemu.ini",
        &format!("[QEMU]\nCommand={}\n", missing.display()),
    )?;

    assert_eq!(sandbox.run_with(&config)?, Some(FAILURE_STATUS));
    Ok(())
}

#[test]
fn overlong_field_exits_with_failure() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let marker = sandbox.work_dir().join("should-not-exist");
    let config = sandbox.write_config(
        "qemu.ini",
        &format!(
            "[QEMU]\nCommand=/bin/sh\nArguments=-c \"touch {}\"\nNetwork={}\n",
            marker.display(),
            "n".repeat(300)
        ),
    )?;

    assert_eq!(sandbox.run_with(&config)?, Some(FAILURE_STATUS));
    assert!(!marker.exists(), "nothing may be launched on overflow");
    Ok(())
}

#[test]
fn config_path_can_come_from_environment() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let config = sandbox.write_config(
        "qemu.ini",
        "[QEMU]\nCommand=/bin/sh\nArguments=-c \"exit 9\"\n",
    )?;

    let status = sandbox
        .launcher()
        .env("QEMU_CONTROL_CONFIG", &config)
        .status()?;

    assert_eq!(status.code(), Some(9));
    Ok(())
}

#[test]
fn help_exits_zero_and_bad_flags_fail() -> Result<()> {
    let sandbox = Sandbox::new()?;

    let help = sandbox.launcher().arg("--help").status()?;
    let bogus = sandbox.launcher().arg("--bogus").status()?;

    assert_eq!(help.code(), Some(0));
    assert_eq!(bogus.code(), Some(FAILURE_STATUS));
    Ok(())
}
