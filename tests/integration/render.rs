#[path = "common/mod.rs"]
mod common;

use common::program;
use supervisorgen::{ConfigError, ProgramConfig, render_program};

#[test]
fn single_program_with_environment() {
    let cfg = ProgramConfig::new("myapp", "/opt/myapp", "deploy", "/var/log/myapp")
        .unwrap()
        .with_start_retries(10)
        .with_environment([("APP_ENV", "production")]);

    let expected = "\
[program:myapp]
user            = deploy
directory       = /opt/myapp
command         = /opt/myapp/bin/myapp
environment     = APP_ENV=production
startretries    = 10
stdout_logfile  = /var/log/myapp/myapp.log
stderr_logfile  = /var/log/myapp/myapp.err
";
    assert_eq!(render_program(&cfg).unwrap(), expected);
}

#[test]
fn advanced_stop_settings() {
    let cfg = ProgramConfig::new(
        "advanced-service",
        "/opt/advanced",
        "performance",
        "/var/log/advanced",
    )
    .unwrap()
    .with_stop_wait_secs(60)
    .with_stop_signal("INT")
    .with_priority(100)
    .with_kill_as_group(true)
    .with_exit_codes([0, 1, 2]);

    let expected = "\
[program:advanced-service]
user            = performance
directory       = /opt/advanced
command         = /opt/advanced/bin/advanced-service
stdout_logfile  = /var/log/advanced/advanced-service.log
stderr_logfile  = /var/log/advanced/advanced-service.err
stopwaitsecs    = 60
killasgroup     = true
stopsignal      = INT
priority        = 100
exitcodes       = 0,1,2
";
    assert_eq!(render_program(&cfg).unwrap(), expected);
}

#[test]
fn log_size_applies_to_both_streams() {
    let cfg = program("service1", "deploy", "/var/log/services")
        .with_start_retries(50)
        .with_log_max_bytes("100MB")
        .with_redirect_stderr(true);

    let expected = "\
[program:service1]
user            = deploy
directory       = /opt/service1
command         = /opt/service1/bin/service1
startretries    = 50
stdout_logfile  = /var/log/services/service1.log
stdout_logfile_maxbytes = 100MB
stderr_logfile  = /var/log/services/service1.err
stderr_logfile_maxbytes = 100MB
redirect_stderr = true
";
    assert_eq!(cfg.render().unwrap(), expected);
}

#[test]
fn multi_instance_program() {
    let cfg = program("web-server", "deploy", "/var/log/cluster")
        .with_num_procs(3)
        .with_process_name("%(program_name)s_%(process_num)02d")
        .with_environment([("PORT_BASE", "8080")]);

    let expected = "\
[program:web-server]
user            = deploy
directory       = /opt/web-server
command         = /opt/web-server/bin/web-server
environment     = PORT_BASE=8080
stdout_logfile  = /var/log/cluster/web-server.log
stderr_logfile  = /var/log/cluster/web-server.err
numprocs        = 3
process_name    = %(program_name)s_%(process_num)02d
";
    assert_eq!(render_program(&cfg).unwrap(), expected);
}

#[test]
fn high_throughput_rotation() {
    let cfg = program("high-perf", "performance", "/var/log/perf")
        .with_start_retries(100)
        .with_stop_wait_secs(60)
        .with_log_max_bytes("500MB")
        .with_log_backups(50)
        .with_priority(1);

    let expected = "\
[program:high-perf]
user            = performance
directory       = /opt/high-perf
command         = /opt/high-perf/bin/high-perf
startretries    = 100
stdout_logfile  = /var/log/perf/high-perf.log
stdout_logfile_maxbytes = 500MB
stdout_logfile_backups = 50
stderr_logfile  = /var/log/perf/high-perf.err
stderr_logfile_maxbytes = 500MB
stderr_logfile_backups = 50
stopwaitsecs    = 60
priority        = 1
";
    assert_eq!(render_program(&cfg).unwrap(), expected);
}

#[test]
fn development_profile_sets_falsy_values() {
    let cfg = ProgramConfig::new(
        "dev-service",
        "/home/dev/service",
        "developer",
        "/tmp/dev-logs",
    )
    .unwrap()
    .with_auto_start(false)
    .with_auto_restart(false)
    .with_start_retries(1)
    .with_log_max_bytes("10MB")
    .with_log_backups(3)
    .with_redirect_stderr(true)
    .with_stop_as_group(false)
    .with_environment([("NODE_ENV", "development")]);

    let expected = "\
[program:dev-service]
user            = developer
directory       = /home/dev/service
command         = /home/dev/service/bin/dev-service
environment     = NODE_ENV=development
autostart       = false
autorestart     = false
startretries    = 1
stdout_logfile  = /tmp/dev-logs/dev-service.log
stdout_logfile_maxbytes = 10MB
stdout_logfile_backups = 3
stderr_logfile  = /tmp/dev-logs/dev-service.err
stderr_logfile_maxbytes = 10MB
stderr_logfile_backups = 3
redirect_stderr = true
stopasgroup     = false
";
    assert_eq!(render_program(&cfg).unwrap(), expected);
}

#[test]
fn custom_exit_codes_and_signal() {
    let cfg = program("exit-service", "exit-user", "/var/log/exit")
        .with_exit_codes([0, 1, 2, 130])
        .with_stop_signal("QUIT")
        .with_kill_as_group(false);

    let expected = "\
[program:exit-service]
user            = exit-user
directory       = /opt/exit-service
command         = /opt/exit-service/bin/exit-service
stdout_logfile  = /var/log/exit/exit-service.log
stderr_logfile  = /var/log/exit/exit-service.err
killasgroup     = false
stopsignal      = QUIT
exitcodes       = 0,1,2,130
";
    assert_eq!(render_program(&cfg).unwrap(), expected);
}

#[test]
fn defaults_render_only_identity_lines() {
    let cfg = ProgramConfig::new(
        "basic-service",
        "/opt/basic-service",
        "deploy",
        "/var/log/basic",
    )
    .unwrap();

    let expected = "\
[program:basic-service]
user            = deploy
directory       = /opt/basic-service
command         = /opt/basic-service/bin/basic-service
stdout_logfile  = /var/log/basic/basic-service.log
stderr_logfile  = /var/log/basic/basic-service.err
";
    let rendered = render_program(&cfg).unwrap();
    assert_eq!(rendered, expected);
    assert_eq!(rendered.lines().count(), 6);
}

#[test]
fn setting_default_values_still_renders_them() {
    let cfg = program("explicit", "deploy", "/var/log/x")
        .with_auto_start(true)
        .with_priority(999)
        .with_exit_codes([0]);

    let rendered = render_program(&cfg).unwrap();
    assert!(rendered.contains("autostart       = true\n"));
    assert!(rendered.contains("priority        = 999\n"));
    assert!(rendered.contains("exitcodes       = 0\n"));
}

#[test]
fn each_setter_adds_only_its_own_lines() {
    let base = render_program(&program("svc", "deploy", "/var/log/svc")).unwrap();
    let base_lines: Vec<&str> = base.lines().collect();

    let cases: Vec<(ProgramConfig, Vec<&str>)> = vec![
        (
            program("svc", "deploy", "/var/log/svc").with_start_secs(5),
            vec!["startsecs       = 5"],
        ),
        (
            program("svc", "deploy", "/var/log/svc").with_log_backups(2),
            vec!["stdout_logfile_backups = 2", "stderr_logfile_backups = 2"],
        ),
        (
            program("svc", "deploy", "/var/log/svc").with_stop_as_group(true),
            vec!["stopasgroup     = true"],
        ),
        (
            program("svc", "deploy", "/var/log/svc")
                .with_auto_restart_mode("true")
                .unwrap(),
            vec!["autorestart     = true"],
        ),
    ];

    for (cfg, added) in cases {
        let rendered = render_program(&cfg).unwrap();
        let extra: Vec<&str> = rendered
            .lines()
            .filter(|line| !base_lines.contains(line))
            .collect();
        assert_eq!(extra, added);
        assert_eq!(rendered.lines().count(), base_lines.len() + added.len());
    }
}

#[test]
fn blank_required_fields_fail_construction() {
    for args in [
        ("", "/opt/a", "deploy", "/var/log"),
        ("a", "", "deploy", "/var/log"),
        ("a", "/opt/a", " ", "/var/log"),
        ("a", "/opt/a", "deploy", ""),
    ] {
        let result = ProgramConfig::new(args.0, args.1, args.2, args.3);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}

#[test]
fn absolute_name_cannot_escape_root_or_log_dir() {
    let result = ProgramConfig::new("/abs", "/opt/app", "u", "/var/log");
    assert!(matches!(
        result,
        Err(ConfigError::Validation { ref field, .. }) if field == "name"
    ));
}

#[test]
fn root_and_log_dir_are_cleaned_in_derived_paths() {
    let cfg = ProgramConfig::new("app", "/opt/app/../app/", "u", "/var/log//app").unwrap();
    let rendered = render_program(&cfg).unwrap();
    assert!(rendered.contains("directory       = /opt/app/../app/\n"));
    assert!(rendered.contains("command         = /opt/app/bin/app\n"));
    assert!(rendered.contains("stdout_logfile  = /var/log/app/app.log\n"));
    assert!(rendered.contains("stderr_logfile  = /var/log/app/app.err\n"));
}
