//! Drives the controller and task runner end to end against a scripted
//! stand-in for figlet.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use fontlet::controller::{Controller, Event, Settings};
use fontlet::figlet::Figlet;
use fontlet::session::{Screen, Session};
use fontlet::tasks::{Runner, TaskContext};

/// Reports `font_dir` for `-I 2`, refuses `-w`, otherwise prints a banner.
fn write_fake_figlet(path: &Path, font_dir: &Path) {
    let script = format!(
        r#"#!/bin/sh
if [ "$1" = "-I" ]; then
  echo "{dir}"
  exit 0
fi
font="$2"
shift 2
if [ "$1" = "-w" ]; then
  echo "width not supported" >&2
  exit 1
fi
name=$(basename "$font")
name="${{name%.*}}"
printf '%s says %s\n\n\n' "$name" "$1"
"#,
        dir = font_dir.display()
    );
    fs::write(path, script).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

struct Harness {
    controller: Controller,
    runner: Runner,
    session: Session,
    rx: Receiver<Event>,
}

impl Harness {
    fn send(&mut self, event: Event) {
        let effects = self.controller.update(&mut self.session, event);
        assert!(!self.runner.apply(effects));
    }

    fn key(&mut self, code: KeyCode) {
        self.send(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(KeyCode::Char(ch));
        }
    }

    fn pump(&mut self) {
        let event = self
            .rx
            .recv_timeout(Duration::from_secs(20))
            .expect("task completion");
        self.send(event);
    }
}

#[test]
fn type_preview_render_and_save() {
    let root = tempfile::tempdir().unwrap();
    let fonts = root.path().join("share").join("fonts");
    fs::create_dir_all(&fonts).unwrap();
    fs::write(fonts.join("standard.flf"), "").unwrap();
    fs::write(fonts.join("Big.FLF"), "").unwrap();
    fs::write(fonts.join("readme.txt"), "").unwrap();
    let tool = root.path().join("figlet");
    write_fake_figlet(&tool, &root.path().join("share"));

    let (tx, rx) = unbounded();
    let ctx = TaskContext {
        tool: Arc::new(Figlet::new(tool)),
        font_dirs: Vec::new(),
        font_extension: "flf".into(),
    };
    let mut h = Harness {
        controller: Controller::new(Settings::default()),
        runner: Runner::new(ctx, tx),
        session: Session::new(100, 40),
        rx,
    };

    let effects = h.controller.start(&mut h.session);
    assert!(!h.runner.apply(effects));
    h.pump();
    assert_eq!(h.session.screen, Screen::InputText);
    let names: Vec<&str> = h.session.fonts.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Big", "standard"]);

    h.type_text("Hi");
    h.key(KeyCode::Enter);
    assert_eq!(h.session.screen, Screen::LoadingPreviews);
    h.pump();
    assert_eq!(h.session.screen, Screen::SelectFont);
    assert_eq!(h.session.fonts[0].preview, "Big says Hi");
    assert_eq!(h.session.fonts[1].preview, "standard says Hi");

    h.key(KeyCode::Enter);
    assert_eq!(h.session.screen, Screen::GeneratingOutput);
    h.pump();
    assert_eq!(h.session.screen, Screen::OutputChoice);
    assert_eq!(h.session.full_output, "Big says Hi\n\n\n");

    let target = root.path().join("banner.txt");
    h.key(KeyCode::Char('f'));
    h.type_text(target.to_str().unwrap());
    h.key(KeyCode::Enter);
    h.pump();
    assert_eq!(h.session.screen, Screen::StatusMessage);
    assert_eq!(fs::read_to_string(&target).unwrap(), "Big says Hi\n\n\n");

    h.key(KeyCode::Char('x'));
    assert_eq!(h.session.screen, Screen::SelectFont);
}
