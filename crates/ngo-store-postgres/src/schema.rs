//! SQL schema for the NGO PostgreSQL store.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cursos (
    id             BIGSERIAL PRIMARY KEY,
    nome           TEXT NOT NULL,
    descricao      TEXT,
    data_inicio    DATE,
    data_fim       DATE,
    carga_horaria  INTEGER,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS voluntarios (
    id              BIGSERIAL PRIMARY KEY,
    nome            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    telefone        TEXT,
    endereco        TEXT,
    habilidades     TEXT[] NOT NULL DEFAULT '{}',
    disponibilidade TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS alunos (
    id              BIGSERIAL PRIMARY KEY,
    nome            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    telefone        TEXT,
    endereco        TEXT,
    data_nascimento DATE,
    curso_id        BIGINT REFERENCES cursos(id) ON DELETE SET NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS turmas (
    id             BIGSERIAL PRIMARY KEY,
    nome           TEXT NOT NULL,
    curso_id       BIGINT NOT NULL REFERENCES cursos(id) ON DELETE CASCADE,
    voluntario_id  BIGINT REFERENCES voluntarios(id) ON DELETE SET NULL,
    data_inicio    DATE,
    data_fim       DATE,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS turma_alunos (
    turma_id  BIGINT NOT NULL REFERENCES turmas(id) ON DELETE CASCADE,
    aluno_id  BIGINT NOT NULL REFERENCES alunos(id) ON DELETE CASCADE,
    PRIMARY KEY (turma_id, aluno_id)
);

CREATE INDEX IF NOT EXISTS alunos_curso_idx       ON alunos(curso_id);
CREATE INDEX IF NOT EXISTS turmas_curso_idx       ON turmas(curso_id);
CREATE INDEX IF NOT EXISTS turma_alunos_aluno_idx ON turma_alunos(aluno_id);
";
