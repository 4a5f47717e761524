use std::str::FromStr;
use std::sync::Arc;

use painel_lojas::{
    services::importacao_service::{
        gerar_planilha_modelo, processar_csv, validar_dados_importacao, SaidaImportacao,
    },
    AppError, AppState, DadosMarca, Estado, LinhaImportacao, MemoriaStore, PopupTipo, Sessao,
};
use rust_decimal::Decimal;

fn painel() -> AppState {
    AppState::new(Arc::new(MemoriaStore::novo()))
}

fn sessao() -> Sessao {
    Sessao::nova("u1", "operador@painel.com")
}

fn dados_marca(nome: &str, slug: &str) -> DadosMarca {
    DadosMarca {
        nome: nome.to_string(),
        slug: slug.to_string(),
        descricao: None,
        ativa: None,
        valor_padrao_pr: Decimal::ZERO,
        valor_padrao_sp: Decimal::ZERO,
        meta_title: None,
        meta_description: None,
        logo_arquivo: None,
    }
}

async fn criar_marca(painel: &AppState, nome: &str, slug: &str) -> String {
    painel
        .marcas_service
        .salvar_marca(None, &dados_marca(nome, slug), &sessao())
        .await
        .unwrap()
        .id
}

fn linha_valida(slug: &str) -> LinhaImportacao {
    LinhaImportacao {
        slug: Some(slug.to_string()),
        cidade: Some("Londrina".to_string()),
        estado: Some("PR".to_string()),
        telefone: Some("(43) 3333-3333".to_string()),
        preco_inicial: Some("289".to_string()),
        ..LinhaImportacao::default()
    }
}

// ---------------------------------------------------------------------------
// Parse do arquivo
// ---------------------------------------------------------------------------

#[test]
fn parse_apara_celulas_e_trata_vazio_como_ausente() {
    let conteudo = "\
slug,cidade,estado,telefone,preco_inicial
  londrina  , Londrina ,PR,(43) 3333-3333,  289
norte,,PR,(43) 4444-4444,299";

    let linhas = processar_csv(conteudo.as_bytes()).unwrap();

    assert_eq!(linhas.len(), 2);
    assert_eq!(linhas[0].slug.as_deref(), Some("londrina"));
    assert_eq!(linhas[0].cidade.as_deref(), Some("Londrina"));
    assert_eq!(linhas[0].preco_inicial.as_deref(), Some("289"));

    // Célula vazia e coluna ausente no cabeçalho viram `None`.
    assert!(linhas[1].cidade.is_none());
    assert!(linhas[0].link_whatsapp.is_none());
}

#[test]
fn parse_aceita_linha_mais_curta_que_o_cabecalho() {
    let conteudo = "\
slug,cidade,estado,telefone,preco_inicial,link_whatsapp,link_maps,popup_tipo,meta_title,meta_description
londrina,Londrina,PR,(43) 3333-3333,289";

    let linhas = processar_csv(conteudo.as_bytes()).unwrap();

    assert_eq!(linhas.len(), 1);
    assert_eq!(linhas[0].slug.as_deref(), Some("londrina"));
    assert!(linhas[0].link_whatsapp.is_none());
    assert!(linhas[0].meta_description.is_none());
}

#[test]
fn parse_rejeita_arquivo_que_nao_e_texto() {
    let mut conteudo = b"slug,cidade,estado,telefone,preco_inicial\n".to_vec();
    conteudo.extend_from_slice(&[0xFF, 0xFE, 0x00]);
    conteudo.extend_from_slice(b",Londrina,PR,(43) 3333-3333,289\n");

    let erro = processar_csv(&conteudo).unwrap_err();
    assert!(matches!(erro, AppError::Csv(_)));
}

// ---------------------------------------------------------------------------
// Validação da planilha
// ---------------------------------------------------------------------------

#[test]
fn planilha_sem_linhas_invalida_o_arquivo_inteiro() {
    let resultado = validar_dados_importacao(&[]);

    assert!(!resultado.valido);
    assert_eq!(
        resultado.erro_geral.as_deref(),
        Some("O arquivo não contém dados para importação")
    );
    assert!(resultado.erros.is_empty());

    // Um arquivo só com cabeçalho cai no mesmo caso.
    let linhas = processar_csv(b"slug,cidade,estado,telefone,preco_inicial\n").unwrap();
    assert!(linhas.is_empty());
}

#[test]
fn linha_vazia_aponta_todos_os_obrigatorios_de_uma_vez() {
    let resultado = validar_dados_importacao(&[LinhaImportacao::default()]);

    assert!(!resultado.valido);
    assert!(resultado.erro_geral.is_none());
    assert_eq!(resultado.erros.len(), 1);

    let erro = &resultado.erros[0];
    assert_eq!(erro.linha, 2);
    assert_eq!(erro.slug, "Linha 2");
    assert_eq!(
        erro.erros,
        vec![
            "Campo \"slug\" ausente ou vazio",
            "Campo \"cidade\" ausente ou vazio",
            "Campo \"estado\" ausente ou vazio",
            "Campo \"telefone\" ausente ou vazio",
            "Campo \"preco_inicial\" ausente ou vazio",
        ]
    );
}

#[test]
fn linha_com_tres_problemas_recebe_exatamente_tres_mensagens() {
    let linha = LinhaImportacao {
        slug: Some("Londrina!".to_string()),
        cidade: Some("".to_string()),
        estado: Some("XX".to_string()),
        ..linha_valida("ignorado")
    };

    let resultado = validar_dados_importacao(&[linha]);

    assert!(!resultado.valido);
    assert_eq!(resultado.erros.len(), 1);

    let erro = &resultado.erros[0];
    assert_eq!(erro.slug, "Londrina!");
    assert_eq!(
        erro.erros,
        vec![
            "Campo \"cidade\" ausente ou vazio",
            "O slug deve conter apenas letras minúsculas, números e hífen",
            "O estado deve ser PR ou SP",
        ]
    );
}

#[test]
fn slug_maiusculo_passa_porque_sera_gravado_minusculo() {
    let linha = LinhaImportacao {
        slug: Some("Londrina".to_string()),
        estado: Some("pr".to_string()),
        ..linha_valida("ignorado")
    };

    let resultado = validar_dados_importacao(&[linha]);
    assert!(resultado.valido);
}

#[test]
fn popup_e_preco_fora_do_dominio_sao_apontados() {
    let com_popup_invalido = LinhaImportacao {
        popup_tipo: Some("banner".to_string()),
        ..linha_valida("londrina")
    };
    let resultado = validar_dados_importacao(&[com_popup_invalido]);
    assert_eq!(
        resultado.erros[0].erros,
        vec!["O tipo de popup deve ser: whatsapp, raspadinha ou simples"]
    );

    for preco in ["abc", "-10"] {
        let linha = LinhaImportacao {
            preco_inicial: Some(preco.to_string()),
            ..linha_valida("londrina")
        };
        let resultado = validar_dados_importacao(&[linha]);
        assert_eq!(
            resultado.erros[0].erros,
            vec!["O preço inicial deve ser um número não negativo"],
            "preço '{preco}' deveria ser rejeitado"
        );
    }

    // Zero é um preço válido; quem decide o que fazer com ele é a gravação.
    let gratuita = LinhaImportacao {
        preco_inicial: Some("0".to_string()),
        ..linha_valida("londrina")
    };
    assert!(validar_dados_importacao(&[gratuita]).valido);
}

#[test]
fn numeracao_dos_erros_segue_a_posicao_no_arquivo() {
    let linhas = vec![
        linha_valida("londrina"),
        LinhaImportacao {
            estado: Some("XX".to_string()),
            ..linha_valida("maringa")
        },
    ];

    let resultado = validar_dados_importacao(&linhas);

    assert_eq!(resultado.erros.len(), 1);
    assert_eq!(resultado.erros[0].linha, 3);
    assert_eq!(resultado.erros[0].slug, "maringa");
}

// ---------------------------------------------------------------------------
// Importação
// ---------------------------------------------------------------------------

#[tokio::test]
async fn importar_cria_uma_loja_por_linha_valida() {
    let painel = painel();
    let sessao = sessao();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let linhas = vec![linha_valida("londrina"), linha_valida("maringa")];

    let resultados = painel
        .importacao_service
        .importar_lojas(&linhas, &marca_id, &sessao)
        .await;

    assert_eq!(resultados.sucesso, 2);
    assert_eq!(resultados.falhas, 0);

    let lojas = painel
        .lojas_service
        .listar_por_marca(&marca_id, None)
        .await
        .unwrap();

    assert_eq!(lojas.len(), 2);
    for loja in &lojas {
        assert!(loja.ativa);
        assert_eq!(loja.preco_inicial, Decimal::from(289));
        assert!(loja.popup_tipo.is_none());
        assert_eq!(loja.marca_id, marca_id);
    }
}

#[tokio::test]
async fn reimportar_o_mesmo_arquivo_nao_duplica_nada() {
    let painel = painel();
    let sessao = sessao();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let linhas = vec![linha_valida("londrina"), linha_valida("maringa")];

    let primeira = painel
        .importacao_service
        .importar_lojas(&linhas, &marca_id, &sessao)
        .await;
    assert_eq!(primeira.sucesso, 2);

    let segunda = painel
        .importacao_service
        .importar_lojas(&linhas, &marca_id, &sessao)
        .await;

    assert_eq!(segunda.sucesso, 0);
    assert_eq!(segunda.falhas, 2);
    for erro in &segunda.erros {
        assert_eq!(erro.erro, "Já existe uma loja com este slug nesta marca");
    }

    let lojas = painel
        .lojas_service
        .listar_por_marca(&marca_id, None)
        .await
        .unwrap();
    assert_eq!(lojas.len(), 2);
}

#[tokio::test]
async fn mesmo_arquivo_importa_para_marcas_diferentes() {
    let painel = painel();
    let sessao = sessao();
    let moura = criar_marca(&painel, "Moura", "moura").await;
    let heliar = criar_marca(&painel, "Heliar", "heliar").await;

    let linhas = vec![linha_valida("londrina")];

    let na_moura = painel
        .importacao_service
        .importar_lojas(&linhas, &moura, &sessao)
        .await;
    let na_heliar = painel
        .importacao_service
        .importar_lojas(&linhas, &heliar, &sessao)
        .await;

    assert_eq!(na_moura.sucesso, 1);
    assert_eq!(na_heliar.sucesso, 1);
}

#[tokio::test]
async fn slug_repetido_dentro_do_arquivo_derruba_so_a_segunda_linha() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let linhas = vec![linha_valida("londrina"), linha_valida("londrina")];

    let resultados = painel
        .importacao_service
        .importar_lojas(&linhas, &marca_id, &sessao())
        .await;

    assert_eq!(resultados.sucesso, 1);
    assert_eq!(resultados.falhas, 1);
    assert_eq!(resultados.erros[0].slug, "londrina");
}

#[tokio::test]
async fn preco_que_nao_parseia_vira_zero_na_gravacao() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let linha = LinhaImportacao {
        preco_inicial: Some("N/D".to_string()),
        ..linha_valida("londrina")
    };

    let resultados = painel
        .importacao_service
        .importar_lojas(&[linha], &marca_id, &sessao())
        .await;
    assert_eq!(resultados.sucesso, 1);

    let lojas = painel
        .lojas_service
        .listar_por_marca(&marca_id, None)
        .await
        .unwrap();
    assert_eq!(lojas[0].preco_inicial, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Fluxo completo do arquivo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fluxo_completo_importa_um_arquivo_valido() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let conteudo = "\
slug,cidade,estado,telefone,preco_inicial,link_whatsapp,link_maps,popup_tipo,meta_title,meta_description
londrina,Londrina,PR,(43) 3333-3333,289,,,whatsapp,,
maringa,Maringá,pr,(44) 4444-4444,299.90,,,,,";

    let saida = painel
        .importacao_service
        .importar_csv(conteudo.as_bytes(), &marca_id, &sessao())
        .await;

    let SaidaImportacao::Concluida { resultados } = saida else {
        panic!("arquivo válido deveria ter sido importado: {saida:?}");
    };
    assert_eq!(resultados.sucesso, 2);
    assert_eq!(resultados.falhas, 0);

    let lojas = painel
        .lojas_service
        .listar_por_marca(&marca_id, Some(Estado::PR))
        .await
        .unwrap();
    assert_eq!(lojas.len(), 2);

    let maringa = lojas.iter().find(|loja| loja.slug == "maringa").unwrap();
    assert_eq!(maringa.estado, Estado::PR);
    assert_eq!(maringa.preco_inicial, Decimal::from_str("299.90").unwrap());
    assert!(maringa.popup_tipo.is_none());

    let londrina = lojas.iter().find(|loja| loja.slug == "londrina").unwrap();
    assert_eq!(londrina.popup_tipo, Some(PopupTipo::Whatsapp));
}

#[tokio::test]
async fn arquivo_com_erros_e_rejeitado_sem_gravar_nada() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let conteudo = "\
slug,cidade,estado,telefone,preco_inicial
londrina,Londrina,PR,(43) 3333-3333,289
maringa,Maringá,XX,(44) 4444-4444,299";

    let saida = painel
        .importacao_service
        .importar_csv(conteudo.as_bytes(), &marca_id, &sessao())
        .await;

    let SaidaImportacao::Rejeitada { mensagem, validacao } = saida else {
        panic!("arquivo com estado inválido deveria ser rejeitado");
    };
    assert_eq!(mensagem, "Existem erros nos dados que impedem a importação");

    let validacao = validacao.expect("a rejeição por validação carrega o detalhe");
    assert_eq!(validacao.erros.len(), 1);
    assert_eq!(validacao.erros[0].slug, "maringa");

    // Nem a linha válida foi gravada.
    let lojas = painel
        .lojas_service
        .listar_por_marca(&marca_id, None)
        .await
        .unwrap();
    assert!(lojas.is_empty());
}

#[tokio::test]
async fn arquivo_ilegivel_e_rejeitado_com_o_erro_de_parse() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let mut conteudo = b"slug,cidade,estado,telefone,preco_inicial\n".to_vec();
    conteudo.extend_from_slice(&[0xFF, 0xFE]);
    conteudo.extend_from_slice(b",Londrina,PR,(43) 3333-3333,289\n");

    let saida = painel
        .importacao_service
        .importar_csv(&conteudo, &marca_id, &sessao())
        .await;

    let SaidaImportacao::Rejeitada { mensagem, validacao } = saida else {
        panic!("arquivo ilegível deveria ser rejeitado");
    };
    assert_eq!(mensagem, "Erro na importação: Falha ao processar o arquivo CSV");
    assert!(validacao.is_none());
}

#[tokio::test]
async fn arquivo_so_com_cabecalho_e_rejeitado() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let saida = painel
        .importacao_service
        .importar_csv(
            b"slug,cidade,estado,telefone,preco_inicial\n",
            &marca_id,
            &sessao(),
        )
        .await;

    let SaidaImportacao::Rejeitada { validacao, .. } = saida else {
        panic!("arquivo sem dados deveria ser rejeitado");
    };
    assert_eq!(
        validacao.unwrap().erro_geral.as_deref(),
        Some("O arquivo não contém dados para importação")
    );
}

// ---------------------------------------------------------------------------
// Planilha modelo
// ---------------------------------------------------------------------------

#[test]
fn modelo_comeca_com_o_cabecalho_canonico() {
    let modelo = gerar_planilha_modelo();

    assert_eq!(
        modelo.lines().next(),
        Some(
            "slug,cidade,estado,telefone,preco_inicial,link_whatsapp,link_maps,popup_tipo,meta_title,meta_description"
        )
    );
}

#[test]
fn modelo_passa_na_propria_validacao() {
    let modelo = gerar_planilha_modelo();

    let linhas = processar_csv(modelo.as_bytes()).unwrap();
    assert_eq!(linhas.len(), 2);

    // A descrição com vírgula sobrevive inteira ao parse.
    assert_eq!(
        linhas[0].meta_description.as_deref(),
        Some("Encontre as melhores baterias em Londrina. Preços a partir de R$ 289,00.")
    );
    assert_eq!(linhas[1].slug.as_deref(), Some("maringa"));

    let resultado = validar_dados_importacao(&linhas);
    assert!(resultado.valido, "{:?}", resultado.erros);
}

#[tokio::test]
async fn modelo_importa_de_ponta_a_ponta() {
    let painel = painel();
    let marca_id = criar_marca(&painel, "Moura", "moura").await;

    let saida = painel
        .importacao_service
        .importar_csv(gerar_planilha_modelo().as_bytes(), &marca_id, &sessao())
        .await;

    let SaidaImportacao::Concluida { resultados } = saida else {
        panic!("a planilha modelo tem que importar sem erros");
    };
    assert_eq!(resultados.sucesso, 2);

    let lojas = painel
        .lojas_service
        .listar_por_marca(&marca_id, None)
        .await
        .unwrap();

    let maringa = lojas.iter().find(|loja| loja.slug == "maringa").unwrap();
    assert_eq!(maringa.popup_tipo, Some(PopupTipo::Raspadinha));
    assert_eq!(maringa.preco_inicial, Decimal::from(299));
}
