use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use codeplay::app::Playground;
use codeplay::kernel::services::adapters::{
    ensure_settings_file, get_progress_path, load_settings, resolve_download_dir,
    LineRead, LineSource, ProcessExecutor, ProgressStore, PromptPicker, StaticIdentity,
};
use codeplay::kernel::services::ports::{
    CodeExecutor, FilePicker, IdentityProvider, PlaygroundConfig, Settings,
};
use codeplay::kernel::{Action, LanguageId, SearchOptions, TabPatch};

mod logging;

/// 空闲时处理后台消息（自动保存、通知过期）的间隔
const IDLE_POLL: Duration = Duration::from_millis(200);

const HELP: &str = "\
Perintah:
  tabs                     daftar tab
  new [nama]               tab baru
  switch <id>              aktifkan tab
  close [id]               tutup tab (default: tab aktif)
  show                     tampilkan isi tab aktif dan hasil pemeriksaan
  edit                     ganti isi tab aktif (akhiri dengan baris '.')
  lang <bahasa>            ubah bahasa tab aktif
  rename <nama>            ubah nama tab aktif
  open [path...]           buka file
  folder [path]            buka folder
  refresh                  muat ulang pohon folder
  tree                     tampilkan pohon folder
  node <n>                 buka file / buka-tutup folder nomor n
  save                     simpan tab aktif (tab memori diunduh)
  find <kata>              cari di tab aktif
  replace <kata> <ganti>   ganti semua
  case on|off              pencarian peka huruf besar
  regex on|off             pencarian dengan regex
  run [stdin]              jalankan kode
  notes                    daftar notifikasi
  dismiss <id> | clear     tutup notifikasi
  answer <id> <teks>       simpan draf jawaban tantangan
  done <id>                tandai tutorial selesai
  progress                 tampilkan progres
  whoami                   pengguna saat ini
  quit                     keluar";

struct Cli {
    playground: Playground,
    picker: Arc<PromptPicker>,
    lines: LineSource,
    identity: StaticIdentity,
    progress: Option<ProgressStore>,
    wait: Duration,
    last_seen: u64,
}

fn main() -> io::Result<()> {
    let _logging = logging::init();

    let mut open_paths: Vec<PathBuf> = Vec::new();
    let mut folder: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--folder" => folder = args.next().map(PathBuf::from),
            "-h" | "--help" => {
                println!("codeplay [--folder <dir>] [file...]\n\n{}", HELP);
                return Ok(());
            }
            _ => open_paths.push(PathBuf::from(arg)),
        }
    }

    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "ensure_settings_file failed");
    }
    let settings: Settings = load_settings().unwrap_or_default();
    let mut config = PlaygroundConfig::from_settings(&settings);
    config.download_dir = resolve_download_dir(config.download_dir.as_deref());
    let wait = config.execution.timeout() + Duration::from_secs(5);

    let lines = LineSource::stdin()?;
    let picker = Arc::new(PromptPicker::new(lines.clone()));
    let executor: Arc<dyn CodeExecutor> =
        Arc::new(ProcessExecutor::new(config.execution.clone()));
    let file_picker: Arc<dyn FilePicker> = picker.clone();
    let playground = Playground::new(config, Some(file_picker), Some(executor))?;

    let progress = get_progress_path().and_then(|path| match ProgressStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "progress store unavailable");
            None
        }
    });

    let mut cli = Cli {
        playground,
        picker,
        lines,
        identity: StaticIdentity::from_settings(&settings.identity),
        progress,
        wait,
        last_seen: 0,
    };

    if !open_paths.is_empty() {
        cli.picker.preset().push_files(open_paths);
        cli.dispatch(Action::OpenFiles);
    }
    if let Some(dir) = folder {
        cli.picker.preset().push_directory(dir);
        cli.dispatch(Action::OpenFolder);
    }

    cli.playground.start_autosave();
    cli.greet();
    cli.flush_notifications();

    let mut show_prompt = true;
    loop {
        if !cli.playground.is_idle() {
            cli.playground.wait_idle(IDLE_POLL);
            cli.playground.tick(Instant::now());
            cli.flush_notifications();
            continue;
        }

        if show_prompt {
            print!("> ");
            io::stdout().flush()?;
            show_prompt = false;
        }

        let mut line = String::new();
        let read = cli.lines.recv_timeout(IDLE_POLL, &mut line);
        cli.playground.pump();
        cli.playground.tick(Instant::now());
        match read {
            LineRead::Line => {}
            LineRead::Idle => {
                if cli.has_fresh_notifications() {
                    println!();
                    cli.flush_notifications();
                    show_prompt = true;
                }
                continue;
            }
            LineRead::Closed => break,
        }

        if !cli.execute(line.trim()) {
            break;
        }
        cli.flush_notifications();
        show_prompt = true;
    }

    cli.playground.stop_autosave();
    cli.dispatch(Action::AutosaveTick);
    Ok(())
}

impl Cli {
    fn dispatch(&mut self, action: Action) {
        self.playground.dispatch(action);
        if !self.playground.wait_idle(self.wait) {
            println!("(masih diproses di latar belakang)");
        }
    }

    fn greet(&self) {
        match self.identity.current_user() {
            Some(user) => println!(
                "Halo, {} ({})! Ketik 'help' untuk daftar perintah.",
                user.name,
                self.identity.resolve_role(&user)
            ),
            None => println!("Halo! Ketik 'help' untuk daftar perintah."),
        }
    }

    fn has_fresh_notifications(&self) -> bool {
        self.playground
            .state()
            .notifications
            .items()
            .first()
            .is_some_and(|n| n.id.raw() > self.last_seen)
    }

    fn flush_notifications(&mut self) {
        let fresh: Vec<String> = self
            .playground
            .state()
            .notifications
            .items()
            .iter()
            .rev()
            .filter(|n| n.id.raw() > self.last_seen)
            .map(|n| {
                let mut text = format!("[{}] {}", n.kind.label(), n.title);
                if let Some(message) = &n.message {
                    text.push_str(": ");
                    text.push_str(message);
                }
                text
            })
            .collect();
        if let Some(newest) = self.playground.state().notifications.items().first() {
            self.last_seen = self.last_seen.max(newest.id.raw());
        }
        for line in fresh {
            println!("{}", line);
        }
    }

    fn parse_tab(&self, arg: &str) -> Option<codeplay::kernel::TabId> {
        let raw: u64 = arg.trim().parse().ok()?;
        self.playground
            .state()
            .session
            .tabs()
            .iter()
            .find(|t| t.id.raw() == raw)
            .map(|t| t.id)
    }

    /// 返回 false 表示退出
    fn execute(&mut self, line: &str) -> bool {
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => return false,
            "tabs" => self.print_tabs(),
            "new" => {
                let name = (!rest.is_empty()).then(|| rest.to_string());
                self.dispatch(Action::NewTab {
                    content: String::new(),
                    name,
                });
            }
            "switch" => match self.parse_tab(rest) {
                Some(id) => self.dispatch(Action::ActivateTab(id)),
                None => println!("tab tidak ditemukan"),
            },
            "close" => {
                let id = if rest.is_empty() {
                    Some(self.playground.state().session.active_id())
                } else {
                    self.parse_tab(rest)
                };
                match id {
                    Some(id) => self.dispatch(Action::CloseTab(id)),
                    None => println!("tab tidak ditemukan"),
                }
            }
            "show" => self.print_active(),
            "edit" => self.edit_active(),
            "lang" => match LanguageId::parse(rest) {
                Some(language) => self.patch_active(TabPatch {
                    language: Some(language),
                    ..TabPatch::default()
                }),
                None => println!("bahasa tidak dikenal: {}", rest),
            },
            "rename" if !rest.is_empty() => self.patch_active(TabPatch {
                name: Some(rest.to_string()),
                ..TabPatch::default()
            }),
            "open" => {
                if !rest.is_empty() {
                    self.picker
                        .preset()
                        .push_files(rest.split_whitespace().map(PathBuf::from));
                }
                self.dispatch(Action::OpenFiles);
            }
            "folder" => {
                if !rest.is_empty() {
                    self.picker.preset().push_directory(rest);
                }
                self.dispatch(Action::OpenFolder);
            }
            "refresh" => self.dispatch(Action::RefreshTree),
            "tree" => self.print_tree(),
            "node" => {
                let row = rest.parse::<usize>().ok().and_then(|n| {
                    self.playground
                        .state()
                        .explorer
                        .tree
                        .as_ref()
                        .and_then(|tree| tree.flatten_for_view().get(n).map(|r| r.id))
                });
                match row {
                    Some(id) => self.dispatch(Action::OpenTreeNode(id)),
                    None => println!("nomor tidak valid"),
                }
            }
            "save" => self.dispatch(Action::Save),
            "find" => self.dispatch(Action::Find {
                term: rest.to_string(),
            }),
            "replace" => {
                let (term, replacement) = rest
                    .split_once(char::is_whitespace)
                    .map(|(t, r)| (t.to_string(), r.trim().to_string()))
                    .unwrap_or_else(|| (rest.to_string(), String::new()));
                self.dispatch(Action::ReplaceAll { term, replacement });
            }
            "case" | "regex" => {
                let on = rest == "on";
                let mut options: SearchOptions = self.playground.state().search.options;
                if cmd == "case" {
                    options.case_sensitive = on;
                } else {
                    options.use_regex = on;
                }
                self.dispatch(Action::SetSearchOptions(options));
            }
            "run" => {
                let stdin = (!rest.is_empty()).then(|| format!("{}\n", rest));
                self.dispatch(Action::Run { stdin });
                self.print_output();
            }
            "notes" => self.print_notifications(),
            "dismiss" => {
                let id = rest.parse::<u64>().ok().and_then(|raw| {
                    self.playground
                        .state()
                        .notifications
                        .items()
                        .iter()
                        .find(|n| n.id.raw() == raw)
                        .map(|n| n.id)
                });
                match id {
                    Some(id) => self.dispatch(Action::DismissNotification(id)),
                    None => println!("notifikasi tidak ditemukan"),
                }
            }
            "clear" => self.dispatch(Action::ClearNotifications),
            "answer" => self.save_answer(rest),
            "done" => self.mark_done(rest),
            "progress" => self.print_progress(),
            "whoami" => self.greet(),
            _ => println!("perintah tidak dikenal, ketik 'help'"),
        }
        true
    }

    fn patch_active(&mut self, patch: TabPatch) {
        let id = self.playground.state().session.active_id();
        self.dispatch(Action::UpdateTab { id, patch });
    }

    fn edit_active(&mut self) {
        println!("Masukkan isi baru, akhiri dengan baris '.'");
        let mut content = String::new();
        while let Some(line) = self.lines.recv() {
            if line == "." {
                break;
            }
            content.push_str(&line);
            content.push('\n');
        }
        self.patch_active(TabPatch::content(content));
    }

    fn print_tabs(&self) {
        let session = &self.playground.state().session;
        let active = session.active_id();
        for tab in session.tabs() {
            println!(
                "{} {:>3} {}{} [{}]{}",
                if tab.id == active { "*" } else { " " },
                tab.id.raw(),
                tab.name,
                if tab.saved { "" } else { " ●" },
                tab.language.display_name(),
                if tab.is_from_file_system() { "" } else { " (memori)" },
            );
        }
    }

    fn print_active(&self) {
        let state = self.playground.state();
        let Some(tab) = state.session.active_tab() else {
            return;
        };
        println!("── {} [{}] ──", tab.name, tab.language.display_name());
        for (i, line) in tab.content.lines().enumerate() {
            println!("{:>4} │ {}", i + 1, line);
        }
        for d in &state.diagnostics {
            println!("  baris {} [{}] {}", d.line, d.severity.label(), d.message);
        }
    }

    fn print_tree(&self) {
        let explorer = &self.playground.state().explorer;
        let Some(tree) = explorer.tree.as_ref() else {
            println!("belum ada folder yang dibuka");
            return;
        };
        println!("{} ({})", tree.root_name(), tree.absolute_root().display());
        let selected = tree.selected();
        for (i, row) in tree.flatten_for_view().iter().enumerate() {
            let marker = match (row.is_dir, row.is_expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            println!(
                "{:>3}{}{}{}{}",
                i,
                if selected == Some(row.id) { "›" } else { " " },
                "  ".repeat(row.depth as usize),
                marker,
                row.name.to_string_lossy()
            );
        }
    }

    fn print_output(&self) {
        let output = &self.playground.state().output;
        if let Some(last) = &output.last {
            if !last.stdout.is_empty() {
                print!("{}", last.stdout);
            }
            if !last.stderr.is_empty() {
                eprint!("{}", last.stderr);
            }
        }
        if let Some(error) = &output.error {
            println!("{}", error);
        }
    }

    fn print_notifications(&self) {
        for n in self.playground.state().notifications.items() {
            println!(
                "{:>3} [{}] {}{}",
                n.id.raw(),
                n.kind.label(),
                n.title,
                n.message
                    .as_deref()
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            );
        }
    }

    fn save_answer(&mut self, rest: &str) {
        let Some((id, text)) = rest.split_once(char::is_whitespace) else {
            println!("format: answer <id> <teks>");
            return;
        };
        let Some(progress) = self.progress.as_mut() else {
            println!("penyimpanan progres tidak tersedia");
            return;
        };
        match progress.save_answer(id, text.trim()) {
            Ok(()) => println!("draf jawaban {} disimpan", id),
            Err(e) => println!("gagal menyimpan jawaban: {}", e),
        }
    }

    fn mark_done(&mut self, id: &str) {
        if id.is_empty() {
            println!("format: done <id>");
            return;
        }
        let Some(progress) = self.progress.as_mut() else {
            println!("penyimpanan progres tidak tersedia");
            return;
        };
        match progress.mark_tutorial_completed(id) {
            Ok(true) => println!("tutorial {} selesai", id),
            Ok(false) => println!("tutorial {} sudah selesai sebelumnya", id),
            Err(e) => println!("gagal menyimpan progres: {}", e),
        }
    }

    fn print_progress(&self) {
        let Some(progress) = self.progress.as_ref() else {
            println!("penyimpanan progres tidak tersedia");
            return;
        };
        println!("tutorial selesai: {}", progress.completed_tutorials().join(", "));
    }
}
