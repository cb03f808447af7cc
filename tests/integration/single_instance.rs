use std::time::Duration;

use anyhow::Result;

use crate::common::{wait_for_file, Sandbox};

#[test]
fn second_instance_exits_zero_while_first_runs() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let work = sandbox.work_dir();
    let first_config = sandbox.write_config(
        "first.ini",
        &format!(
            "[QEMU]\nCommand=/bin/sh\nStartupPath={}\nArguments=-c \"touch started && sleep 2 && exit 7\"\n",
            work.display()
        ),
    )?;
    let second_config = sandbox.write_config(
        "second.ini",
        &format!(
            "[QEMU]\nCommand=/bin/sh\nStartupPath={}\nArguments=-c \"touch second-ran\"\n",
            work.display()
        ),
    )?;

    let mut first = sandbox.launcher().arg(&first_config).spawn()?;
    wait_for_file(&work.join("started"), Duration::from_secs(10))?;

    let second = sandbox.run_with(&second_config)?;
    let first_status = first.wait()?;

    assert_eq!(second, Some(0), "second instance should exit 0");
    assert!(
        !work.join("second-ran").exists(),
        "second instance must not launch anything"
    );
    assert_eq!(first_status.code(), Some(7), "first instance passes its child's code");
    Ok(())
}

#[test]
fn sequential_instances_both_launch() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let config = sandbox.write_config(
        "qemu.ini",
        "[QEMU]\nCommand=/bin/sh\nArguments=-c \"exit 3\"\n",
    )?;

    assert_eq!(sandbox.run_with(&config)?, Some(3));
    assert_eq!(sandbox.run_with(&config)?, Some(3));
    Ok(())
}

#[test]
fn separate_lock_directories_do_not_interfere() -> Result<()> {
    let busy = Sandbox::new()?;
    let idle = Sandbox::new()?;
    let work = busy.work_dir();
    let busy_config = busy.write_config(
        "busy.ini",
        &format!(
            "[QEMU]\nCommand=/bin/sh\nStartupPath={}\nArguments=-c \"touch started && sleep 2\"\n",
            work.display()
        ),
    )?;
    let idle_config = idle.write_config(
        "idle.ini",
        "[QEMU]\nCommand=/bin/sh\nArguments=-c \"exit 5\"\n",
    )?;

    let mut running = busy.launcher().arg(&busy_config).spawn()?;
    wait_for_file(&work.join("started"), Duration::from_secs(10))?;

    assert_eq!(idle.run_with(&idle_config)?, Some(5));
    assert_eq!(running.wait()?.code(), Some(0));
    Ok(())
}

#[test]
fn killed_instance_does_not_block_later_launches() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let work = sandbox.work_dir();
    let long_config = sandbox.write_config(
        "long.ini",
        &format!(
            "[QEMU]\nCommand=/bin/sh\nStartupPath={}\nArguments=-c \"touch started && sleep 2\"\n",
            work.display()
        ),
    )?;
    let short_config = sandbox.write_config(
        "short.ini",
        "[QEMU]\nCommand=/bin/sh\nArguments=-c \"exit 9\"\n",
    )?;

    let mut killed = sandbox.launcher().arg(&long_config).spawn()?;
    wait_for_file(&work.join("started"), Duration::from_secs(10))?;
    killed.kill()?;
    killed.wait()?;

    assert_eq!(
        sandbox.run_with(&short_config)?,
        Some(9),
        "lock must be released when its holder is killed"
    );
    Ok(())
}
