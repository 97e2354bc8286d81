//! SQL schema for the NGO SQLite store.
//!
//! Executed on every connection open. `PRAGMA foreign_keys` is per-connection
//! in SQLite, so it must be part of the batch.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cursos (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    nome           TEXT NOT NULL,
    descricao      TEXT,
    data_inicio    TEXT,             -- YYYY-MM-DD
    data_fim       TEXT,             -- YYYY-MM-DD
    carga_horaria  INTEGER,
    created_at     TEXT NOT NULL,    -- RFC 3339 UTC, microseconds
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS voluntarios (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    nome            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    telefone        TEXT,
    endereco        TEXT,
    habilidades     TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    disponibilidade TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS alunos (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    nome            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    telefone        TEXT,
    endereco        TEXT,
    data_nascimento TEXT,
    curso_id        INTEGER REFERENCES cursos(id) ON DELETE SET NULL,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS turmas (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    nome           TEXT NOT NULL,
    curso_id       INTEGER NOT NULL REFERENCES cursos(id) ON DELETE CASCADE,
    voluntario_id  INTEGER REFERENCES voluntarios(id) ON DELETE SET NULL,
    data_inicio    TEXT,
    data_fim       TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Roster join table. Rows are only ever replaced wholesale.
CREATE TABLE IF NOT EXISTS turma_alunos (
    turma_id  INTEGER NOT NULL REFERENCES turmas(id) ON DELETE CASCADE,
    aluno_id  INTEGER NOT NULL REFERENCES alunos(id) ON DELETE CASCADE,
    PRIMARY KEY (turma_id, aluno_id)
);

CREATE INDEX IF NOT EXISTS alunos_curso_idx       ON alunos(curso_id);
CREATE INDEX IF NOT EXISTS turmas_curso_idx       ON turmas(curso_id);
CREATE INDEX IF NOT EXISTS turma_alunos_aluno_idx ON turma_alunos(aluno_id);

PRAGMA user_version = 1;
";
